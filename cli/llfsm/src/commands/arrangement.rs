//! `llfsm arrangement`: convert an arrangement file and the machines it uses.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use llfsm_transform::{convert_arrangement, Arrangement};
use tracing::debug;

/// Convert the arrangement in `file`, resolving machine paths against `base_dir`
/// (the file's directory when `None`).
pub fn run(file: &Path, base_dir: Option<&Path>, output: Option<&Path>, pretty: bool) -> Result<()> {
    let arrangement = convert(file, base_dir)?;
    match output {
        Some(path) => super::write_json(&arrangement, path, pretty),
        None => {
            print!("{}", summary(&arrangement));
            Ok(())
        }
    }
}

pub(crate) fn convert(file: &Path, base_dir: Option<&Path>) -> Result<Arrangement> {
    let model = llfsm_model::parse::load_arrangement(file)
        .with_context(|| format!("reading arrangement {}", file.display()))?;
    let base_dir = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => file_dir(file),
    };
    debug!(base_dir = %base_dir.display(), "resolving machine references");
    convert_arrangement(&model, &base_dir)
        .with_context(|| format!("converting arrangement {}", file.display()))
}

fn file_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub(crate) fn summary(arrangement: &Arrangement) -> String {
    let mut out = format!(
        "arrangement: {} machines, {} external signals, {} signals, {} clocks\n",
        arrangement.machines().len(),
        arrangement.external_signals().len(),
        arrangement.signals().len(),
        arrangement.clocks().len(),
    );
    for (instance, mapping) in arrangement.machines().iter() {
        out.push_str(&format!(
            "  {}: {} ({} mappings)\n",
            instance.name(),
            instance.type_name(),
            mapping.mappings().len()
        ));
    }
    out
}
