//! Show command implementation

use std::path::{Path, PathBuf};

use console::Style;

use crate::archive::{self, ArchiveEntry};
use crate::cli::ShowArgs;
use crate::deps::{PYTHON_DEPS_FILE, SYSTEM_DEPS_FILE, system};
use crate::error::{self, Result};
use crate::hash;
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::ui::display::{display_opt_field, format_size};

/// What a bundle declares, read without extracting or running it
#[derive(Debug)]
struct BundleInfo {
    path: PathBuf,
    digest: String,
    manifest: Manifest,
    has_manifest: bool,
    system_packages: Vec<String>,
    requirements: Vec<String>,
    entries: Vec<ArchiveEntry>,
}

impl BundleInfo {
    fn entry_present(&self) -> bool {
        let entry_point = self.manifest.entry_point.trim_start_matches("./");
        self.entries
            .iter()
            .any(|e| !e.is_dir && e.name == entry_point)
    }
}

pub fn run(args: ShowArgs) -> Result<()> {
    let info = inspect(&args.bundle)?;
    display_bundle(&info);
    Ok(())
}

fn inspect(path: &Path) -> Result<BundleInfo> {
    let entries = archive::list_entries(path)?;

    let manifest_text = archive::read_text_entry(path, MANIFEST_FILE)?;
    let has_manifest = manifest_text.is_some();
    let manifest = match manifest_text {
        Some(text) => Manifest::from_json(&text)
            .map_err(|e| error::manifest::invalid(MANIFEST_FILE, e.to_string()))?,
        None => Manifest::default(),
    };

    let system_packages = archive::read_text_entry(path, SYSTEM_DEPS_FILE)?
        .map(|text| system::parse_package_list(&text))
        .unwrap_or_default();
    let requirements = archive::read_text_entry(path, PYTHON_DEPS_FILE)?
        .map(|text| system::parse_package_list(&text))
        .unwrap_or_default();

    Ok(BundleInfo {
        path: path.to_path_buf(),
        digest: hash::bundle_digest(path)?,
        manifest,
        has_manifest,
        system_packages,
        requirements,
        entries,
    })
}

fn display_bundle(info: &BundleInfo) {
    let title = info
        .manifest
        .name
        .clone()
        .unwrap_or_else(|| info.path.display().to_string());
    println!("{}", Style::new().bold().yellow().apply_to(title));

    display_opt_field!("Version:", info.manifest.version);
    display_opt_field!("Description:", info.manifest.description);
    if !info.has_manifest {
        println!(
            "  {} {}",
            Style::new().bold().apply_to("Manifest:"),
            Style::new().dim().apply_to("none (defaults apply)")
        );
    }

    let entry_state = if info.entry_present() {
        Style::new().green().apply_to("present")
    } else {
        Style::new().red().apply_to("missing")
    };
    println!(
        "  {} {} ({})",
        Style::new().bold().apply_to("Entry point:"),
        info.manifest.entry_point,
        entry_state
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Requires sudo:"),
        if info.manifest.sudo { "yes" } else { "no" }
    );

    display_list("System packages:", &info.system_packages);
    display_list("Python requirements:", &info.requirements);

    let total: u64 = info.entries.iter().map(|e| e.size).sum();
    println!(
        "  {} {} ({})",
        Style::new().bold().apply_to("Files:"),
        info.entries.iter().filter(|e| !e.is_dir).count(),
        format_size(total)
    );
    for entry in info.entries.iter().filter(|e| !e.is_dir) {
        println!(
            "    {} {}",
            entry.name,
            Style::new().dim().apply_to(format_size(entry.size))
        );
    }

    println!(
        "  {} {}",
        Style::new().bold().apply_to("Digest:"),
        Style::new().dim().apply_to(&info.digest)
    );
}

fn display_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!(
            "  {} {}",
            Style::new().bold().apply_to(label),
            Style::new().dim().apply_to("None")
        );
        return;
    }
    println!("  {}", Style::new().bold().apply_to(label));
    for item in items {
        println!("    - {}", Style::new().cyan().apply_to(item));
    }
}
