#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `VLIST_DEMO_*` prefix.

use std::env;
use std::process;

use vlist::StrategyKind;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
vlist demo: three virtualized lists and a scroll-to button, printed as text

USAGE:
    vlist-demo [OPTIONS]

OPTIONS:
    --items=N              Dataset length (default: 1000)
    --container-height=N   Viewport height of each list (default: 300)
    --overscan=N           Items rendered beyond each edge (default: 5)
    --scroll-to=N          Offset applied by the scroll-to action (default: 1000)
    --no-scroll            Print the initial frame only
    --list=KIND            Only show one list: fixed, variable or dynamic
    --log=FILTER           Tracing filter, e.g. 'vlist=debug' (default: warn)
    --help, -h             Show this help message
    --version, -V          Show version

LISTS:
    fixed      Every row is 50 tall; the scroll-to action drives this list
    variable   Row heights cycle 50, 75, 100
    dynamic    Row heights are measured after each render

ENVIRONMENT VARIABLES:
    VLIST_DEMO_ITEMS              Override --items
    VLIST_DEMO_CONTAINER_HEIGHT   Override --container-height
    VLIST_DEMO_OVERSCAN           Override --overscan
    VLIST_DEMO_SCROLL_TO          Override --scroll-to
    VLIST_DEMO_LIST               Override --list
    VLIST_DEMO_LOG                Override --log";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Dataset length shared by every list.
    pub items: usize,
    /// Viewport height of each list.
    pub container_height: f64,
    /// Overscan count of each list.
    pub overscan: usize,
    /// Offset applied by the scroll-to action; `None` skips it.
    pub scroll_to: Option<f64>,
    /// Show a single list instead of all three.
    pub only: Option<StrategyKind>,
    /// Tracing filter directive.
    pub log: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            items: 1000,
            container_height: 300.0,
            overscan: vlist::DEFAULT_OVERSCAN,
            scroll_to: Some(1000.0),
            only: None,
            log: "warn".into(),
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();
        opts.apply_env(|key| env::var(key).ok());

        let args: Vec<String> = env::args().skip(1).collect();
        for arg in &args {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("vlist-demo {VERSION}");
                    process::exit(0);
                }
                other => {
                    if let Err(msg) = opts.apply_arg(other) {
                        eprintln!("{msg}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }

    /// Apply `VLIST_DEMO_*` overrides. Unparsable values are ignored.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("VLIST_DEMO_ITEMS")
            && let Ok(n) = val.parse()
        {
            self.items = n;
        }
        if let Some(val) = var("VLIST_DEMO_CONTAINER_HEIGHT")
            && let Ok(n) = val.parse()
        {
            self.container_height = n;
        }
        if let Some(val) = var("VLIST_DEMO_OVERSCAN")
            && let Ok(n) = val.parse()
        {
            self.overscan = n;
        }
        if let Some(val) = var("VLIST_DEMO_SCROLL_TO")
            && let Ok(n) = val.parse()
        {
            self.scroll_to = Some(n);
        }
        if let Some(val) = var("VLIST_DEMO_LIST")
            && let Ok(kind) = val.parse()
        {
            self.only = Some(kind);
        }
        if let Some(val) = var("VLIST_DEMO_LOG") {
            self.log = val;
        }
    }

    /// Apply one command-line flag.
    fn apply_arg(&mut self, arg: &str) -> Result<(), String> {
        if arg == "--no-scroll" {
            self.scroll_to = None;
        } else if let Some(val) = arg.strip_prefix("--items=") {
            self.items = val
                .parse()
                .map_err(|_| format!("Invalid --items value: {val}"))?;
        } else if let Some(val) = arg.strip_prefix("--container-height=") {
            self.container_height = val
                .parse()
                .map_err(|_| format!("Invalid --container-height value: {val}"))?;
        } else if let Some(val) = arg.strip_prefix("--overscan=") {
            self.overscan = val
                .parse()
                .map_err(|_| format!("Invalid --overscan value: {val}"))?;
        } else if let Some(val) = arg.strip_prefix("--scroll-to=") {
            let offset = val
                .parse()
                .map_err(|_| format!("Invalid --scroll-to value: {val}"))?;
            self.scroll_to = Some(offset);
        } else if let Some(val) = arg.strip_prefix("--list=") {
            let kind = val.parse::<StrategyKind>().map_err(|e| e.to_string())?;
            self.only = Some(kind);
        } else if let Some(val) = arg.strip_prefix("--log=") {
            self.log = val.to_string();
        } else {
            return Err(format!("Unknown argument: {arg}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.items, 1000);
        assert_eq!(opts.container_height, 300.0);
        assert_eq!(opts.overscan, 5);
        assert_eq!(opts.scroll_to, Some(1000.0));
        assert_eq!(opts.only, None);
        assert_eq!(opts.log, "warn");
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_lists_every_strategy() {
        assert!(HELP_TEXT.contains("fixed"));
        assert!(HELP_TEXT.contains("variable"));
        assert!(HELP_TEXT.contains("dynamic"));
        assert!(HELP_TEXT.contains("VLIST_DEMO_SCROLL_TO"));
    }

    #[test]
    fn env_overrides_defaults() {
        let mut opts = Opts::default();
        opts.apply_env(|key| match key {
            "VLIST_DEMO_ITEMS" => Some("50".into()),
            "VLIST_DEMO_LIST" => Some("Variable".into()),
            "VLIST_DEMO_OVERSCAN" => Some("not a number".into()),
            _ => None,
        });
        assert_eq!(opts.items, 50);
        assert_eq!(opts.only, Some(StrategyKind::Variable));
        assert_eq!(opts.overscan, 5);
    }

    #[test]
    fn args_override_fields() {
        let mut opts = Opts::default();
        opts.apply_arg("--container-height=200").unwrap();
        opts.apply_arg("--scroll-to=2500").unwrap();
        opts.apply_arg("--list=dynamic").unwrap();
        assert_eq!(opts.container_height, 200.0);
        assert_eq!(opts.scroll_to, Some(2500.0));
        assert_eq!(opts.only, Some(StrategyKind::Dynamic));

        opts.apply_arg("--no-scroll").unwrap();
        assert_eq!(opts.scroll_to, None);
    }

    #[test]
    fn bad_args_are_rejected() {
        let mut opts = Opts::default();
        assert!(opts.apply_arg("--items=lots").is_err());
        assert!(opts.apply_arg("--frobnicate").is_err());
        let err = opts.apply_arg("--list=grid").unwrap_err();
        assert!(err.contains("grid"), "{err}");
    }
}
