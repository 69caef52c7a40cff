use std::process::ExitCode;

/// Process exit status of a `vloc` run.
///
/// `references` only reports, so it never fails on what it finds; `literals`
/// fails as soon as one literal still needs localizing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Scan finished. No localizable literal left, or a report-only command.
    Success,
    /// Scan finished with localizable literals, or `init` found an existing config.
    Failure,
    /// Scan could not run: bad arguments, config, resource entries or paths.
    Error,
}

impl ExitStatus {
    /// Status of a `literals` scan that found `localizable` literals.
    pub fn for_localizable(localizable: usize) -> Self {
        if localizable == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(match status {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Error => 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }

    #[test]
    fn test_localizable_literals_fail_the_scan() {
        assert_eq!(ExitStatus::for_localizable(0), ExitStatus::Success);
        assert_eq!(ExitStatus::for_localizable(3), ExitStatus::Failure);
    }
}
