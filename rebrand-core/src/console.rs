use nu_ansi_term::{Color as AnsiColor, Style};

/// Width of the section banners.
const BANNER_WIDTH: usize = 60;

/// Human-facing progress output.
///
/// Steps and detail lines go to stdout, errors and warnings to stderr.
/// A silent console swallows everything, which is what machine-readable
/// modes and tests want.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Console {
    use_color: bool,
    verbose: bool,
    silent: bool,
}

impl Console {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self {
            use_color,
            verbose,
            silent: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            use_color: false,
            verbose: false,
            silent: true,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.silent
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    pub fn paint(&self, color: AnsiColor, text: &str) -> String {
        if self.use_color {
            color.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn paint_style(&self, style: Style, text: &str) -> String {
        if self.use_color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// A major step: `==> message`.
    pub fn step(&self, message: &str) {
        if !self.silent {
            println!("{} {}", self.paint(AnsiColor::Green, "==>"), message);
        }
    }

    /// Detail shown only in verbose mode: `  → message`.
    pub fn detail(&self, message: &str) {
        if self.is_verbose() {
            println!("{} {}", self.paint(AnsiColor::Blue, "  →"), message);
        }
    }

    pub fn line(&self, message: &str) {
        if !self.silent {
            println!("{message}");
        }
    }

    pub fn blank(&self) {
        self.line("");
    }

    pub fn error(&self, message: &str) {
        if !self.silent {
            eprintln!("{} {}", self.paint(AnsiColor::Red, "ERROR:"), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.silent {
            eprintln!("{} {}", self.paint(AnsiColor::Yellow, "WARNING:"), message);
        }
    }

    /// Title framed by two heavy rules.
    pub fn banner(&self, title: &str) {
        if self.silent {
            return;
        }
        let rule = "═".repeat(BANNER_WIDTH);
        println!();
        println!("{}", self.paint(AnsiColor::Blue, &rule));
        println!("{}", self.paint(AnsiColor::Blue, title));
        println!("{}", self.paint(AnsiColor::Blue, &rule));
        println!();
    }

    /// Section heading used by the verifier checklist.
    pub fn section(&self, title: &str) {
        self.line(&self.paint(AnsiColor::Blue, &format!("=== {title} ===")));
    }

    pub fn rule(&self) -> String {
        self.paint(AnsiColor::Blue, &"═".repeat(BANNER_WIDTH))
    }
}
