#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};

pub const MASTER_CSV: &str = "canonical,source\n\
Caymus Cab SS 2016,curated\n\
Caymus Cab 2017 1.5Ltr,curated\n\
Silver Oak Cab Alex 2015,curated\n\
Silver Oak Cab Napa 2014,curated\n\
Opus One 2015,curated\n\
Opus One Overture,curated\n\
Dominus Napanook 2018,curated\n\
Harlan Estate The Maiden 2015,curated\n\
Jordan Cab 2016 case,curated\n\
~Don Julio 1942,curated\n\
Unlisted Winery Merlot 2012,curated\n";

pub const ACME_REGISTRY: &str = r#"{
  "wineries": [
    {
      "name": "Acme",
      "pattern": "\\bacme\\b",
      "abbreviations": [{ "phrase": "Oak", "pattern": "\\boakville\\b" }],
      "priority": ["Tok", "Oak", "Res"]
    }
  ],
  "grapes": [{ "name": "Cab", "pattern": "\\bcab(ernet)?\\b" }],
  "sizes": [{ "name": "375mL", "pattern": "\\b375\\s*ml\\b" }]
}"#;

/// Temp workspace with an empty vinmatch home inside it.
pub fn workspace(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("vinmatch-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_file(path: &Path, body: &str) {
    let result = fs::write(path, body);
    assert!(result.is_ok());
}

pub fn read_file(path: &Path) -> String {
    let result = fs::read_to_string(path);
    assert!(result.is_ok());
    result.unwrap_or_default()
}
