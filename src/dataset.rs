use crate::error::IoError;
use crate::tensor::Tensor;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Layout of a delimited sample file.
///
/// Every non-blank line holds an integer class label followed by exactly `feature_count`
/// numeric features, separated by `delimiter`.
///
/// # Fields
///
/// - `feature_count` - Number of feature columns after the label (default 64)
/// - `class_count` - Width of the one-hot target rows (default 10)
/// - `feature_scale` - Every feature is divided by this value (default 255)
/// - `delimiter` - Column separator (default `,`)
/// - `has_header` - Whether the first line is a header to skip (default `false`)
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub feature_count: usize,
    pub class_count: usize,
    pub feature_scale: f32,
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            feature_count: 64,
            class_count: 10,
            feature_scale: 255.0,
            delimiter: ',',
            has_header: false,
        }
    }
}

/// Loads features and one-hot targets from a delimited text file.
///
/// See [`parse_csv`] for the format.
///
/// # Returns
///
/// - `Ok((Tensor<2>, Tensor<2>))` - Features `[samples, feature_count]` and targets `[samples, class_count]`
/// - `Err(IoError)` - If the file cannot be read or parsed
pub fn load_csv<P: AsRef<Path>>(
    path: P,
    options: &CsvOptions,
) -> Result<(Tensor<2>, Tensor<2>), IoError> {
    let file = File::open(path)?;
    parse_csv(BufReader::new(file), options)
}

/// Parses features and one-hot targets from any buffered reader.
///
/// Features are divided by `feature_scale`. The label selects the column set to 1.0 in the
/// target row; a label of `class_count` or more leaves the whole target row at zero.
/// Blank lines are skipped.
///
/// # Returns
///
/// - `Ok((Tensor<2>, Tensor<2>))` - Features and targets, row-aligned by sample
/// - `Err(IoError::ParseError)` - A label or feature is not a number, a line has the wrong
///   number of features, or no sample was found
/// - `Err(IoError::StdIoError)` - If reading fails
///
/// # Example
/// ```rust
/// use ferronet::dataset::{CsvOptions, parse_csv};
///
/// let options = CsvOptions { feature_count: 2, class_count: 3, ..CsvOptions::default() };
/// let (x, y) = parse_csv("1,0,255\n2,51,102\n".as_bytes(), &options).unwrap();
/// assert_eq!(x.shape(), &[2, 2]);
/// assert_eq!(y.as_slice(), &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
/// ```
pub fn parse_csv<R: BufRead>(
    reader: R,
    options: &CsvOptions,
) -> Result<(Tensor<2>, Tensor<2>), IoError> {
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if (options.has_header && index == 0) || line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(options.delimiter).map(str::trim);
        let label_field = fields.next().unwrap_or_default();
        let label: usize = label_field.parse().map_err(|_| IoError::ParseError {
            line: line_number,
            message: format!("invalid label '{}'", label_field),
        })?;

        let row_start = features.len();
        for field in fields {
            let value: f32 = field.parse().map_err(|_| IoError::ParseError {
                line: line_number,
                message: format!("invalid feature '{}'", field),
            })?;
            features.push(value / options.feature_scale);
        }

        let found = features.len() - row_start;
        if found != options.feature_count {
            return Err(IoError::ParseError {
                line: line_number,
                message: format!(
                    "expected {} features, found {}",
                    options.feature_count, found
                ),
            });
        }
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(IoError::ParseError {
            line: 0,
            message: "no samples found".to_string(),
        });
    }

    let samples = labels.len();
    let x = Tensor::from_vec([samples, options.feature_count], features)?;
    let mut y = Tensor::zeros([samples, options.class_count]);
    for (row, &label) in labels.iter().enumerate() {
        if label < options.class_count {
            y[[row, label]] = 1.0;
        }
    }

    Ok((x, y))
}
