//! Output mode routing logic.

use std::io::IsTerminal;

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain text, stable for logs and scripts
    #[default]
    Plain,
    /// Bordered tables and colored status (TTY only)
    Pretty,
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// Routing rules:
    /// 1. `--json` overrides everything (exclusive mode)
    /// 2. `--format plain` forces plain, `--format table` forces pretty
    /// 3. `TERM=dumb` forces plain
    /// 4. Pretty only when stdout is TTY
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> anyhow::Result<Self> {
        if json_flag {
            return Ok(Self::Json);
        }

        match format_flag {
            Some("plain") => return Ok(Self::Plain),
            Some("table") => return Ok(Self::Pretty),
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "Invalid format: {} (use table or plain)",
                    other
                ))
            }
            None => {}
        }

        if term_is_dumb {
            return Ok(Self::Plain);
        }

        Ok(if is_tty { Self::Pretty } else { Self::Plain })
    }

    /// Resolve against the real terminal.
    pub fn from_env(json_flag: bool, format_flag: Option<&str>) -> anyhow::Result<Self> {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false);
        Self::resolve(json_flag, format_flag, is_tty, term_is_dumb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_wins() {
        assert_eq!(
            OutputMode::resolve(true, Some("plain"), true, false).unwrap(),
            OutputMode::Json
        );
    }

    #[test]
    fn test_tty_and_dumb_terminal() {
        assert_eq!(OutputMode::resolve(false, None, true, false).unwrap(), OutputMode::Pretty);
        assert_eq!(OutputMode::resolve(false, None, true, true).unwrap(), OutputMode::Plain);
        assert_eq!(OutputMode::resolve(false, None, false, false).unwrap(), OutputMode::Plain);
    }

    #[test]
    fn test_format_flag() {
        assert_eq!(
            OutputMode::resolve(false, Some("table"), false, false).unwrap(),
            OutputMode::Pretty
        );
        assert!(OutputMode::resolve(false, Some("csv"), false, false).is_err());
    }
}
