//! Form state behind the Pack3r command line.

use tracing::debug;

use super::options::{Pack3rOption, Verbosity};
use super::paths;
use super::{Pack3rCommand, ValidationError};

/// Archives Pack3r skips scanning unless told otherwise.
pub const NO_SCAN_DEFAULT: &str = "pak1.pk3 pak2.pk3 mp_bin.pk3";
/// Archives Pack3r scans but doesn't pack unless told otherwise.
pub const NO_PACK_DEFAULT: &str =
    "pak0.pk3 pak0.pk3dir lights.pk3 sd-mapobjects.pk3 common.pk3 astro-skies.pk3";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct OptionState {
    enabled: bool,
    value: String,
}

/// Paths, toggles and values that make up a Pack3r command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    pack3r_path: String,
    map_path: String,
    options: [OptionState; Pack3rOption::COUNT],
    verbosity: Verbosity,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            pack3r_path: String::new(),
            map_path: String::new(),
            options: Default::default(),
            verbosity: Verbosity::default(),
        };
        builder.apply_defaults();
        builder
    }

    fn apply_defaults(&mut self) {
        self.option_mut(Pack3rOption::NoScan).value = NO_SCAN_DEFAULT.to_string();
        self.option_mut(Pack3rOption::NoPack).value = NO_PACK_DEFAULT.to_string();
        self.set_verbosity(Verbosity::default());
    }

    /// Back to a fresh form. Paths are cleared too.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn option(&self, option: Pack3rOption) -> &OptionState {
        &self.options[option.index()]
    }

    fn option_mut(&mut self, option: Pack3rOption) -> &mut OptionState {
        &mut self.options[option.index()]
    }

    pub fn pack3r_path(&self) -> &str {
        &self.pack3r_path
    }

    pub fn set_pack3r_path(&mut self, path: impl Into<String>) {
        self.pack3r_path = path.into();
    }

    pub fn map_path(&self) -> &str {
        &self.map_path
    }

    pub fn set_map_path(&mut self, path: impl Into<String>) {
        self.map_path = path.into();
    }

    /// Selects a map file and derives the output path from it.
    pub fn load_map(&mut self, path: &str) -> Result<(), ValidationError> {
        if !paths::is_valid_map_path(path) {
            return Err(ValidationError::InvalidMapPath(path.to_string()));
        }

        self.map_path = path.to_string();
        let output = paths::auto_fill_output_path(path, self.is_enabled(Pack3rOption::Source));
        debug!(map = %path, output = %output, "Loaded map");
        self.set_output_path(output);
        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.option(Pack3rOption::Output).value
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        self.option_mut(Pack3rOption::Output).value = path.into();
    }

    /// Points the output at `dir`, named after the current map if one is set.
    pub fn set_output_directory(&mut self, dir: &str) {
        let output = if self.map_path.is_empty() {
            dir.to_string()
        } else {
            paths::output_in_directory(dir, &self.map_path, self.is_enabled(Pack3rOption::Source))
        };
        self.set_output_path(output);
    }

    pub fn is_enabled(&self, option: Pack3rOption) -> bool {
        self.option(option).enabled
    }

    pub fn value(&self, option: Pack3rOption) -> &str {
        &self.option(option).value
    }

    pub fn set_enabled(&mut self, option: Pack3rOption, enabled: bool) {
        // Verbosity is driven by the selected level
        if option == Pack3rOption::Verbosity {
            return;
        }

        self.option_mut(option).enabled = enabled;

        if option == Pack3rOption::Source {
            if let Some(output) = paths::update_output_extension(self.output_path(), enabled) {
                self.set_output_path(output);
            }
        }
    }

    pub fn toggle(&mut self, option: Pack3rOption) {
        let enabled = self.is_enabled(option);
        self.set_enabled(option, !enabled);
    }

    pub fn set_value(&mut self, option: Pack3rOption, value: impl Into<String>) {
        if option == Pack3rOption::Verbosity {
            return;
        }
        self.option_mut(option).value = value.into();
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Info is Pack3r's default, so `-v` is only passed for other levels.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
        let state = self.option_mut(Pack3rOption::Verbosity);
        state.enabled = verbosity != Verbosity::Info;
        state.value = verbosity.arg().to_string();
    }

    pub fn cycle_verbosity(&mut self) {
        self.set_verbosity(self.verbosity.next());
    }

    /// The command line for the current form state.
    ///
    /// The map comes first, followed by enabled options in fixed order.
    pub fn build(&self) -> Pack3rCommand {
        let mut args = Vec::new();

        if !self.map_path.is_empty() {
            args.push(self.map_path.clone());
        }

        for option in Pack3rOption::ALL {
            let state = self.option(option);
            if !state.enabled {
                continue;
            }

            args.push(option.flag().to_string());
            if option.takes_value() {
                args.push(state.value.clone());
            }
        }

        Pack3rCommand {
            program: self.pack3r_path.clone(),
            args,
        }
    }

    /// Checks that Pack3r can be started with the current form.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pack3r_path.is_empty() {
            return Err(ValidationError::MissingPack3r);
        }
        if self.map_path.is_empty() {
            return Err(ValidationError::MissingMap);
        }
        if self.output_path().is_empty() {
            return Err(ValidationError::MissingOutput);
        }
        if cfg!(unix) && !paths::is_executable(&self.pack3r_path) {
            return Err(ValidationError::NotExecutable(self.pack3r_path.clone()));
        }
        Ok(())
    }
}
