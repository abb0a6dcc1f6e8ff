//! Link shorthand handling.
//!
//! Link text as written (`Note#Heading`, `folder/Note#^block|Alias`,
//! `../Note.md`) is reduced to a link path before lookup, and link paths are
//! resolved against the source note's folder rather than the vault root.

/// Reduce raw link text to the path used for lookup.
///
/// Drops the `|alias` suffix, then the `#heading` / `#^block` suffix, then
/// surrounding whitespace.
pub fn link_path(text: &str) -> &str {
    let text = text.split('|').next().unwrap_or_default();
    let text = text.split('#').next().unwrap_or_default();
    text.trim()
}

/// Folder part of a vault path (`"a/b/Note.md"` -> `"a/b"`, `"Note.md"` -> `""`).
pub fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|index| &path[..index]).unwrap_or("")
}

/// File name without folder or `.md` extension.
pub fn basename(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    strip_md_extension(name)
}

/// Remove a trailing `.md`, ignoring case.
pub fn strip_md_extension(path: &str) -> &str {
    let len = path.len();
    if len >= 3 && path.is_char_boundary(len - 3) && path[len - 3..].eq_ignore_ascii_case(".md") {
        &path[..len - 3]
    } else {
        path
    }
}

/// Resolve `link` against the folder containing `source_path`.
///
/// `.` and `..` segments are folded; `..` past the vault root stays at the
/// root. The result has no leading slash and no extension added.
///
/// `resolve_relative("Notes/Source.md", "../Ideas/Idea")` == `"Ideas/Idea"`
pub fn resolve_relative(source_path: &str, link: &str) -> String {
    let mut segments: Vec<&str> = if link.starts_with('/') {
        Vec::new()
    } else {
        parent_dir(source_path)
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    };

    for part in link.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            part => segments.push(part),
        }
    }

    segments.join("/")
}

/// Pick the note a link path points to, Obsidian style.
///
/// In order of preference:
/// 1. the path resolved relative to the source note's folder,
/// 2. the path taken from the vault root,
/// 3. any note whose path ends with the link path (a bare name matches by
///    file name), preferring notes in the source's folder, then the shortest
///    path.
///
/// Comparison ignores case and the `.md` extension.
pub fn first_linkpath_dest<'a, I>(
    candidates: I,
    linkpath: &str,
    source_path: &str,
) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let linkpath = strip_md_extension(linkpath.trim());
    if linkpath.is_empty() {
        return None;
    }

    let relative = resolve_relative(source_path, linkpath).to_lowercase();
    let absolute = resolve_relative("", linkpath).to_lowercase();
    let suffix = format!("/{}", linkpath.trim_start_matches('/').to_lowercase());
    let source_dir = parent_dir(source_path).to_lowercase();

    let mut relative_hit = None;
    let mut absolute_hit = None;
    let mut best_suffix: Option<(bool, usize, &'a str)> = None;

    for candidate in candidates {
        let key = strip_md_extension(candidate).to_lowercase();
        if key == relative {
            relative_hit = Some(candidate);
            break;
        }
        if key == absolute {
            absolute_hit.get_or_insert(candidate);
            continue;
        }
        if format!("/{key}").ends_with(&suffix) {
            let rank = (parent_dir(&key) != source_dir, candidate.len(), candidate);
            let better = match best_suffix {
                None => true,
                Some(current) => rank < current,
            };
            if better {
                best_suffix = Some(rank);
            }
        }
    }

    relative_hit
        .or(absolute_hit)
        .or(best_suffix.map(|(_, _, candidate)| candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_path_strips_fragment_and_alias() {
        assert_eq!(link_path("B#section"), "B");
        assert_eq!(link_path("B#^block-id"), "B");
        assert_eq!(link_path("folder/B#section|Alias"), "folder/B");
        assert_eq!(link_path(" B "), "B");
        assert_eq!(link_path("#local"), "");
    }

    #[test]
    fn test_basename_and_parent() {
        assert_eq!(basename("a/b/Note.md"), "Note");
        assert_eq!(basename("Note"), "Note");
        assert_eq!(parent_dir("a/b/Note.md"), "a/b");
        assert_eq!(parent_dir("Note.md"), "");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_relative("Notes/Source.md", "../Ideas/Idea"), "Ideas/Idea");
        assert_eq!(resolve_relative("Notes/Source.md", "./Sibling"), "Notes/Sibling");
        assert_eq!(resolve_relative("Notes/Source.md", "/Root"), "Root");
        assert_eq!(resolve_relative("Source.md", "../../Up"), "Up");
    }

    #[test]
    fn test_first_linkpath_dest_prefers_source_folder() {
        let paths = ["archive/B.md", "projects/B.md", "projects/deep/B.md"];
        let found = first_linkpath_dest(paths, "B", "projects/A.md");
        assert_eq!(found, Some("projects/B.md"));

        let found = first_linkpath_dest(paths, "B", "elsewhere/A.md");
        assert_eq!(found, Some("archive/B.md"));
    }

    #[test]
    fn test_first_linkpath_dest_relative_and_partial_paths() {
        let paths = ["Ideas/Idea.md", "Notes/Idea.md", "x/deep/Target.md"];
        assert_eq!(
            first_linkpath_dest(paths, "../Ideas/Idea", "Notes/Source.md"),
            Some("Ideas/Idea.md")
        );
        assert_eq!(first_linkpath_dest(paths, "deep/Target", ""), Some("x/deep/Target.md"));
        assert_eq!(first_linkpath_dest(paths, "idea.md", "Notes/S.md"), Some("Notes/Idea.md"));
        assert_eq!(first_linkpath_dest(paths, "Missing", ""), None);
        assert_eq!(first_linkpath_dest(paths, "", ""), None);
    }
}
