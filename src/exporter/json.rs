// file: src/exporter/json.rs
// description: json export of the active thesis tree with a manifest

use crate::error::{PipelineError, Result};
use crate::models::{Section, SectionTree};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const THESIS_FILE: &str = "thesis.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    pretty: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_sections: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir, pretty })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the whole tree to `thesis.json` followed by `manifest.json`.
    pub fn export_tree(&self, tree: &SectionTree) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);

        self.write_json(THESIS_FILE, tree)?;

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_sections: tree.len(),
            files: vec![THESIS_FILE.to_string()],
        };
        self.write_json(MANIFEST_FILE, &manifest)?;

        info!(
            "Export complete: {} sections exported",
            manifest.total_sections
        );
        Ok(manifest)
    }

    /// Writes one section, with its subsections, to `<id>.json`.
    pub fn export_section(&self, tree: &SectionTree, section_id: &str) -> Result<PathBuf> {
        let section: &Section = tree
            .find(section_id)
            .ok_or_else(|| PipelineError::Export(format!("no section with id {}", section_id)))?;

        let file_name = format!("{}.json", sanitize_file_stem(section_id));
        let path = self.write_json(&file_name, section)?;
        info!("Exported section {} to {:?}", section_id, path);
        Ok(path)
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let path = self.output_dir.join(file_name);
        fs::write(&path, json).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {:?}", path);
        Ok(path)
    }
}

fn sanitize_file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
