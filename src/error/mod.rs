use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("GTK application exited with status {status}")]
    GtkExit { status: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gtk_exit_reports_status() {
        let err = AppError::GtkExit {
            status: "ExitCode(2)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GTK application exited with status ExitCode(2)"
        );
    }
}
