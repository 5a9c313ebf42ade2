//! Runtime configuration for the debinning core (TOML on disk).
//!
//! Every field has a serde default so partial files work; a missing file is
//! replaced by written-out defaults so the knobs are discoverable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::bins::FrequencyBins;
use crate::core::directional::AssembleParams;
use crate::core::smooth::SolverParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverSection {
    #[serde(default = "SolverSection::default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "SolverSection::default_tolerance")]
    pub tolerance: f64,
}

impl SolverSection {
    fn default_max_iter() -> usize {
        100
    }
    fn default_tolerance() -> f64 {
        1e-5
    }
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            max_iter: Self::default_max_iter(),
            tolerance: Self::default_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSection {
    /// Absolute frequency-step deviation bound for grid detection.
    #[serde(default = "GridSection::default_absolute_tolerance")]
    pub absolute_tolerance: f64,
}

impl GridSection {
    fn default_absolute_tolerance() -> f64 {
        FrequencyBins::DEFAULT_ABS_TOLERANCE
    }
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            absolute_tolerance: Self::default_absolute_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblySection {
    /// Worker threads for the per-direction solves; 1 runs sequentially.
    #[serde(default = "AssemblySection::default_workers")]
    pub workers: usize,
}

impl AssemblySection {
    fn default_workers() -> usize {
        1
    }
}

impl Default for AssemblySection {
    fn default() -> Self {
        Self {
            workers: Self::default_workers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebinConfig {
    #[serde(default)]
    pub solver: SolverSection,
    #[serde(default)]
    pub grid: GridSection,
    #[serde(default)]
    pub assembly: AssemblySection,
}

impl DebinConfig {
    /// Read `path` if it exists; otherwise write the defaults there and
    /// return them. Unreadable or unparsable files fall back to defaults
    /// with a warning rather than aborting.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => {
                eprintln!("Failed to serialize default config: {err}");
            }
        }
        default_cfg
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            max_iter: self.solver.max_iter,
            tolerance: self.solver.tolerance,
        }
    }

    pub fn assemble_params(&self) -> AssembleParams {
        AssembleParams {
            solver: self.solver_params(),
            grid_tolerance: self.grid.absolute_tolerance,
            workers: self.assembly.workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "wavedebin_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn load_or_default_writes_defaults() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = DebinConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.solver.max_iter, 100);
        assert_eq!(cfg.solver.tolerance, 1e-5);
        assert_eq!(cfg.grid.absolute_tolerance, 1e-3);
        assert_eq!(cfg.assembly.workers, 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_existing() {
        let path = unique_path("custom.toml");
        let path_str = path.to_string_lossy().to_string();
        let custom = DebinConfig {
            solver: SolverSection {
                max_iter: 250,
                tolerance: 1e-6,
            },
            grid: GridSection {
                absolute_tolerance: 5e-3,
            },
            assembly: AssemblySection { workers: 4 },
        };
        fs::write(&path, toml::to_string_pretty(&custom).unwrap()).unwrap();

        let cfg = DebinConfig::load_or_default(&path_str);
        assert_eq!(cfg.solver.max_iter, 250);
        assert_eq!(cfg.solver.tolerance, 1e-6);
        assert_eq!(cfg.grid.absolute_tolerance, 5e-3);
        assert_eq!(cfg.assembly.workers, 4);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let path = unique_path("partial.toml");
        let path_str = path.to_string_lossy().to_string();
        fs::write(&path, "[solver]\nmax_iter = 42\n").unwrap();

        let cfg = DebinConfig::load_or_default(&path_str);
        assert_eq!(cfg.solver.max_iter, 42);
        assert_eq!(cfg.solver.tolerance, 1e-5);
        assert_eq!(cfg.assembly.workers, 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn params_conversions_carry_all_knobs() {
        let cfg = DebinConfig {
            solver: SolverSection {
                max_iter: 7,
                tolerance: 1e-4,
            },
            grid: GridSection {
                absolute_tolerance: 2e-3,
            },
            assembly: AssemblySection { workers: 3 },
        };
        let ap = cfg.assemble_params();
        assert_eq!(ap.solver.max_iter, 7);
        assert_eq!(ap.solver.tolerance, 1e-4);
        assert_eq!(ap.grid_tolerance, 2e-3);
        assert_eq!(ap.workers, 3);
    }
}
