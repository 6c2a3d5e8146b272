// Command line arguments
// `quittable-httpd [--config <path>] [port]`

/// Config file looked up when `--config` is not given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "httpd";

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: String,
    /// Raw positional port argument; validated when the config is loaded
    pub port: Option<String>,
}

impl CliArgs {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config_path = DEFAULT_CONFIG_PATH.to_string();
        let mut port = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config_path = args
                        .next()
                        .ok_or_else(|| format!("Missing value for {arg}"))?;
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("Unknown option: {flag}"));
                }
                _ if port.is_none() => port = Some(arg),
                _ => return Err(format!("Unexpected argument: {arg}")),
            }
        }

        Ok(Self { config_path, port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        CliArgs::parse(args.iter().map(ToString::to_string))
    }

    #[test]
    fn test_no_arguments() {
        let args = parse(&[]).expect("parse");
        assert_eq!(args.config_path, DEFAULT_CONFIG_PATH);
        assert_eq!(args.port, None);
    }

    #[test]
    fn test_port_and_config() {
        let args = parse(&["--config", "conf/dev.toml", "8080"]).expect("parse");
        assert_eq!(args.config_path, "conf/dev.toml");
        assert_eq!(args.port.as_deref(), Some("8080"));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["8080", "9090"]).is_err());
    }
}
