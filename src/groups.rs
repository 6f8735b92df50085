use anyhow::{bail, Result};
use regex::Regex;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[derive(Debug)]
struct Group {
    name: String,
    regex: Regex,
}

/// Brand group configuration.
///
/// Brands matching a group's regular expression are reported under the
/// group's name instead of their own.
#[derive(Debug, Default)]
pub struct Groups(Vec<Group>);

impl Groups {
    /// Reads brand group configuration from `path`.
    ///
    /// The configuration file consists of group specifications, one per line,
    /// in the following format:
    ///
    /// ```txt
    /// GROUP_NAME | GROUP_REGEX
    /// ```
    ///
    /// `GROUP_REGEX` can be any regular expression supported by [`regex::Regex`].
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// * The file cannot be opened
    /// * The file cannot be read
    /// * There is a line with an invalid format (no `|` character)
    /// * `GROUP_REGEX` is an invalid regular expression
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut groups = Self::default();
        let file = BufReader::new(File::open(&path)?);
        for line in file.lines() {
            let line = line?;
            let Some((name, regex_str)) = line.split_once(" | ") else {
                bail!(
                    "reading {:?}: bad line format (missing |): {line}",
                    path.as_ref(),
                );
            };
            groups.add(name, regex_str)?;
        }
        Ok(groups)
    }

    /// Adds a new group.
    ///
    /// # Errors
    ///
    /// Returns any errors from compiling `regex_str` with [`Regex::new`].
    pub fn add(&mut self, name: &str, regex_str: &str) -> Result<()> {
        self.0.push(Group {
            name: name.to_string(),
            regex: Regex::new(regex_str)?,
        });
        Ok(())
    }

    /// Returns the group for `brand`, if any. The first matching group wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ratings::Groups;
    /// let mut groups = Groups::default();
    /// groups.add("Xiaomi", "^(xiaomi|redmi|poco)$").unwrap();
    /// assert_eq!(groups.brand_group("redmi"), Some("Xiaomi"));
    /// assert_eq!(groups.brand_group("apple"), None);
    /// ```
    #[must_use]
    pub fn brand_group(&self, brand: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|g| g.regex.is_match(brand))
            .map(|g| g.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
