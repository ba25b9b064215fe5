//! Build script to generate the core icon manifest for WASM builds
//!
//! Scans assets/cores/ and creates a manifest listing every icon folder
//! and its PNG files, since WASM can't enumerate directories at runtime.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=assets/cores");

    let cores_dir = Path::new("assets/cores");
    let manifest_path = cores_dir.join("manifest.txt");

    // Nothing to list (fresh checkout without icons)
    if !cores_dir.is_dir() {
        return;
    }

    let mut manifest = String::new();

    let mut folders: Vec<_> = match fs::read_dir(cores_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect(),
        Err(e) => {
            println!("cargo:warning=failed to read {}: {}", cores_dir.display(), e);
            return;
        }
    };

    folders.sort_by_key(|e| e.file_name());

    for folder in folders {
        let folder_name = folder.file_name().to_string_lossy().to_string();

        // Get all PNG files in the folder
        let mut icons: Vec<_> = match fs::read_dir(folder.path()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| {
                    e.path().is_file()
                        && e.path()
                            .extension()
                            .map(|ext| ext.to_ascii_lowercase() == "png")
                            .unwrap_or(false)
                })
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => continue,
        };

        icons.sort();

        if !icons.is_empty() {
            // Group header: [folder_name]
            manifest.push_str(&format!("[{}]\n", folder_name));

            for icon in icons {
                manifest.push_str(&format!("{}\n", icon));
            }

            manifest.push('\n');
        }
    }

    // Leave an unchanged manifest untouched
    if fs::read_to_string(&manifest_path).ok().as_deref() == Some(manifest.as_str()) {
        return;
    }

    if let Err(e) = fs::write(&manifest_path, manifest) {
        println!("cargo:warning=failed to write {}: {}", manifest_path.display(), e);
    }
}
