use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Prediction task selected on the form. The task decides which input
/// field is read and which payload shape goes over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Numeric,
    Image,
    HandwrittenDigit,
    Text,
    Regression,
}

impl Task {
    /// Wire name, used as the `task_name` field and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Numeric => "numeric",
            Task::Image => "image",
            Task::HandwrittenDigit => "handwritten_digit",
            Task::Text => "text",
            Task::Regression => "regression",
        }
    }

    /// Selector label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Task::Numeric => "数値分類",
            Task::Image => "画像分類",
            Task::HandwrittenDigit => "手書き数字認識",
            Task::Text => "テキスト分類",
            Task::Regression => "回帰予測",
        }
    }

    /// Tasks that upload a file as a multipart form instead of a JSON body.
    pub fn is_image_task(&self) -> bool {
        matches!(self, Task::Image | Task::HandwrittenDigit)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(Task::Numeric),
            "image" => Ok(Task::Image),
            "handwritten_digit" => Ok(Task::HandwrittenDigit),
            "text" => Ok(Task::Text),
            "regression" => Ok(Task::Regression),
            other => Err(ClientError::InvalidInput(format!(
                "unknown task `{}`",
                other
            ))),
        }
    }
}

/// Splits textarea-style input on newlines, then commas, into an f64
/// matrix. Cells are trimmed and blank lines skipped; a cell that does not
/// parse is reported with its row and column.
pub fn parse_numeric_matrix(input: &str) -> Result<Vec<Vec<f64>>, ClientError> {
    let mut matrix = Vec::new();
    for (row, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut values = Vec::new();
        for (col, cell) in line.split(',').enumerate() {
            let cell = cell.trim();
            let value = cell.parse::<f64>().map_err(|_| {
                ClientError::InvalidInput(format!(
                    "row {}, column {}: `{}` is not a number",
                    row + 1,
                    col + 1,
                    cell
                ))
            })?;
            values.push(value);
        }
        matrix.push(values);
    }
    if matrix.is_empty() {
        return Err(ClientError::InvalidInput("numeric input is empty".into()));
    }
    Ok(matrix)
}
