//! Pack3r command line options.

/// Every option the form can pass to Pack3r, in command line order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pack3rOption {
    Output,
    DryRun,
    Rename,
    Verbosity,
    Loose,
    Source,
    ShaderDebug,
    RefDebug,
    Overwrite,
    IncludePk3,
    NoScan,
    NoPack,
    Mods,
}

impl Pack3rOption {
    pub const COUNT: usize = 13;

    pub const ALL: [Pack3rOption; Self::COUNT] = [
        Self::Output,
        Self::DryRun,
        Self::Rename,
        Self::Verbosity,
        Self::Loose,
        Self::Source,
        Self::ShaderDebug,
        Self::RefDebug,
        Self::Overwrite,
        Self::IncludePk3,
        Self::NoScan,
        Self::NoPack,
        Self::Mods,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The flag as Pack3r expects it.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Output => "-o",
            Self::DryRun => "-d",
            Self::Rename => "-r",
            Self::Verbosity => "-v",
            Self::Loose => "-l",
            Self::Source => "-s",
            Self::ShaderDebug => "-sd",
            Self::RefDebug => "-rd",
            Self::Overwrite => "-f",
            Self::IncludePk3 => "-p",
            Self::NoScan => "-ns",
            Self::NoPack => "-np",
            Self::Mods => "-m",
        }
    }

    /// Whether the flag is followed by a value argument.
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            Self::Output | Self::Rename | Self::Verbosity | Self::NoScan | Self::NoPack | Self::Mods
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Output => "Output",
            Self::DryRun => "Dry run",
            Self::Rename => "Rename",
            Self::Verbosity => "Verbosity",
            Self::Loose => "Loose",
            Self::Source => "Source",
            Self::ShaderDebug => "Shader debug",
            Self::RefDebug => "Reference debug",
            Self::Overwrite => "Overwrite",
            Self::IncludePk3 => "Include pk3(dir)s",
            Self::NoScan => "Skip scanning",
            Self::NoPack => "Skip packing",
            Self::Mods => "Include mods",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::Output => "Destination file, or directory, of the packed map",
            Self::DryRun => "Discover packed files and estimate file size without creating a pk3",
            Self::Rename => "Name of the map after packing (renames bsp, lightmaps, mapscript etc.)",
            Self::Verbosity => "Log severity threshold, from least (None) to most (Trace) verbose",
            Self::Loose => "Complete packing even if some files are missing",
            Self::Source => {
                "Pack only source files (.map, editorimages, misc_models) without packing BSP & lightmaps"
            }
            Self::ShaderDebug => "Print shader resolution details (Debug verbosity needed)",
            Self::RefDebug => "Print asset resolution details (Info verbosity needed)",
            Self::Overwrite => "Overwrite existing files in the output path with impunity",
            Self::IncludePk3 => "Include pk3 files and pk3dirs in etmain when indexing files",
            Self::NoScan => "Don't scan these pk3/pk3dirs for assets",
            Self::NoPack => "Scan these pk3s/pk3dirs but don't pack their contents",
            Self::Mods => "Add all pk3s in these mod directories to scanning, but don't pack their contents",
        }
    }
}

/// Pack3r log levels, from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    None,
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub const ALL: [Verbosity; 7] = [
        Self::None,
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Fatal => "Fatal",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info (Default)",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    /// Value passed after `-v`.
    pub fn arg(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Next level, wrapping from Trace back to None.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_order_matches_index() {
        for (i, option) in Pack3rOption::ALL.iter().enumerate() {
            assert_eq!(option.index(), i);
        }
    }

    #[test]
    fn test_valued_options() {
        let valued: Vec<&str> = Pack3rOption::ALL
            .iter()
            .filter(|o| o.takes_value())
            .map(|o| o.flag())
            .collect();

        assert_eq!(valued, vec!["-o", "-r", "-v", "-ns", "-np", "-m"]);
    }

    #[test]
    fn test_verbosity_cycles() {
        assert_eq!(Verbosity::default(), Verbosity::Info);
        assert_eq!(Verbosity::Info.next(), Verbosity::Debug);
        assert_eq!(Verbosity::Trace.next(), Verbosity::None);
    }
}
