use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use domain::Error;

/// Closest common ancestor directory of a set of absolute paths.
///
/// The longest common string prefix of the inputs is returned as-is
/// only when it is an existing directory and every input continues
/// with a path separator right after it (a true directory boundary
/// shared by all of them); otherwise it is truncated to the last
/// separator. A single path therefore resolves to its parent.
pub fn common_parent(paths: &[PathBuf]) -> Result<PathBuf, Error> {
    if paths.is_empty() {
        return Err(Error::InvalidInput(
            "no paths to take the common parent of".into(),
        ));
    }
    let strs: Vec<String> = paths
        .iter()
        .map(|p| {
            if !p.is_absolute() {
                return Err(Error::InvalidInput(format!(
                    "path `{}` is not absolute",
                    p.display()
                )));
            }
            Ok(p.to_string_lossy().into_owned())
        })
        .collect::<Result<_, _>>()?;

    let prefix = longest_common_prefix(&strs);
    let sep = MAIN_SEPARATOR as u8;
    let on_boundary = strs.iter().all(|s| s.as_bytes().get(prefix.len()) == Some(&sep));
    if on_boundary && Path::new(&prefix).is_dir() {
        return Ok(PathBuf::from(prefix));
    }

    // Truncate to the last separator; all inputs are absolute, so one
    // always exists. Never truncate away the root itself.
    let cut = match prefix.rfind(MAIN_SEPARATOR) {
        Some(0) | None => MAIN_SEPARATOR.to_string(),
        Some(idx) => prefix[..idx].to_owned(),
    };
    Ok(PathBuf::from(cut))
}

fn longest_common_prefix(strs: &[String]) -> String {
    let mut prefix = strs[0].clone();
    for s in &strs[1..] {
        let common: usize = prefix
            .chars()
            .zip(s.chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();
        prefix.truncate(common);
    }
    prefix
}
