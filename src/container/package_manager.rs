//! Package manager commands and output parsing

use clap::ValueEnum;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no line starting with 'Version' in package manager output")]
    MissingVersionLine,

    #[error("empty value on version line '{0}'")]
    EmptyVersion(String),
}

/// Package manager available inside the queried images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PackageManager {
    #[default]
    Zypper,
    Dnf,
    Apt,
}

impl PackageManager {
    /// Command refreshing the package index
    pub fn refresh_command(&self) -> Vec<String> {
        let cmd: &[&str] = match self {
            PackageManager::Zypper => &["zypper", "--non-interactive", "refresh"],
            PackageManager::Dnf => &["dnf", "-q", "makecache"],
            PackageManager::Apt => &["apt-get", "-qq", "update"],
        };
        to_strings(cmd)
    }

    /// Command printing the metadata of one package
    pub fn info_command(&self, package: &str) -> Vec<String> {
        let cmd: &[&str] = match self {
            PackageManager::Zypper => &["zypper", "-q", "info"],
            PackageManager::Dnf => &["dnf", "-q", "info"],
            PackageManager::Apt => &["apt-cache", "show", "--no-all-versions"],
        };
        let mut args = to_strings(cmd);
        args.push(package.to_string());
        args
    }
}

fn to_strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Extracts the version from package info output
///
/// Uses the first line starting with `Version`; the value is whatever follows
/// the last `:` on that line.
pub fn parse_version(output: &str) -> Result<String, ParseError> {
    let line = output
        .lines()
        .find(|line| line.starts_with("Version"))
        .ok_or(ParseError::MissingVersionLine)?;

    let value = line.rsplit(':').next().unwrap_or_default().trim();
    if value.is_empty() {
        return Err(ParseError::EmptyVersion(line.to_string()));
    }
    Ok(value.to_string())
}
