//! Output path resolution for a batch of inputs.
//!
//! The compiler mirrors the input tree under the output directory,
//! rooted at the common directory prefix of the batch. Declaration
//! files (`.d.ts`) produce no output at all and are ignored while
//! narrowing the prefix.

use std::path::{Component, Path, PathBuf};

/// File suffix marking a declaration-only input, which produces no
/// compiled output.
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Extension given to compiled output files.
pub const OUTPUT_EXTENSION: &str = "js";

/// Where compiled outputs are placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// Each output lands next to its input.
    InPlace,
    /// Outputs are re-rooted under this directory, preserving the input
    /// tree below the batch's common prefix.
    Directory(PathBuf),
    /// Every input contributes to one merged output file.
    SingleFile(PathBuf),
}

/// Returns `true` for declaration-only inputs (`.d.ts`), compared
/// case-insensitively.
pub fn is_declaration_file(path: &Path) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .ends_with(DECLARATION_SUFFIX)
}

/// Computes the longest shared directory prefix of the batch.
///
/// The comparison is segment-aware (never a raw string prefix) and
/// case-insensitive. Declaration-only inputs are skipped: they produce
/// no output and must not narrow the prefix for the files that do.
/// Returns `None` when two inputs share no leading segment at all
/// (different drive prefixes), or when every input is declaration-only.
pub fn common_prefix(paths: &[PathBuf]) -> Option<PathBuf> {
    let mut first: Option<&PathBuf> = None;
    let mut base: Vec<String> = Vec::new();
    let mut shared_len = 0usize;

    for path in paths {
        if is_declaration_file(path) {
            continue;
        }
        let segments = fold_segments(path);
        match first {
            None => {
                shared_len = segments.len();
                base = segments;
                first = Some(path);
            }
            Some(_) => {
                for i in 0..shared_len {
                    if i == segments.len() {
                        // This path is shorter; it caps the prefix.
                        shared_len = segments.len();
                        break;
                    }
                    if base[i] != segments[i] {
                        shared_len = i;
                        if shared_len == 0 {
                            return None;
                        }
                        break;
                    }
                }
            }
        }
    }

    let first = first?;
    Some(first.components().take(shared_len).collect())
}

/// Computes the output path for one input.
///
/// Declaration-only inputs always map to `None`. Otherwise the common
/// `prefix` is stripped case-insensitively when it applies, the
/// remainder is re-rooted according to `target`, and the extension
/// becomes [`OUTPUT_EXTENSION`]. Without an output directory the file
/// keeps its original directory.
pub fn output_for(path: &Path, prefix: Option<&Path>, target: &OutputTarget) -> Option<PathBuf> {
    if is_declaration_file(path) {
        return None;
    }

    match target {
        OutputTarget::SingleFile(merged) => Some(merged.clone()),
        OutputTarget::InPlace => Some(path.with_extension(OUTPUT_EXTENSION)),
        OutputTarget::Directory(dir) => {
            let rebased = match prefix.and_then(|p| strip_prefix_ci(path, p)) {
                Some(remainder) => dir.join(remainder),
                // No usable prefix: joining an absolute path keeps it
                // absolute, so the file stays where it is.
                None => dir.join(path),
            };
            Some(rebased.with_extension(OUTPUT_EXTENSION))
        }
    }
}

/// Computes the full input → output mapping for a batch.
///
/// The common prefix is computed once over all inputs; the result
/// preserves input order and is reported in full regardless of which
/// inputs actually need rebuilding.
pub fn output_mapping(
    inputs: &[PathBuf],
    target: &OutputTarget,
) -> Vec<(PathBuf, Option<PathBuf>)> {
    let prefix = common_prefix(inputs);
    inputs
        .iter()
        .map(|input| {
            let output = output_for(input, prefix.as_deref(), target);
            (input.clone(), output)
        })
        .collect()
}

/// Splits a path into case-folded comparison segments.
fn fold_segments(path: &Path) -> Vec<String> {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().to_lowercase())
        .collect()
}

/// Strips `prefix` from the front of `path`, comparing segments
/// case-insensitively. Returns the relative remainder, or `None` when
/// `prefix` is not actually a segment-wise prefix of `path`.
fn strip_prefix_ci(path: &Path, prefix: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    for expected in prefix.components() {
        let actual = components.next()?;
        if !component_eq_ci(&actual, &expected) {
            return None;
        }
    }
    Some(components.as_path().to_path_buf())
}

fn component_eq_ci(a: &Component<'_>, b: &Component<'_>) -> bool {
    a.as_os_str()
        .to_string_lossy()
        .to_lowercase()
        .eq(&b.as_os_str().to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn common_prefix_table() {
        let cases: &[(&[&str], Option<&str>)] = &[
            (&["/a/b", "/a/c"], Some("/a")),
            (&["/a/b", "/a/c", "/a/d"], Some("/a")),
            (&["/a/b/c", "/a/b/d"], Some("/a/b")),
            (&["/a/b", "/c/d"], Some("/")),
            (&["/a/b", "a/b"], None),
            (&["/a/b", "/a/b.d.ts"], Some("/a/b")),
            (&["/a/sub/b", "/a"], Some("/a")),
        ];

        for (i, (input, expected)) in cases.iter().enumerate() {
            let result = common_prefix(&paths(input));
            assert_eq!(
                result,
                expected.map(PathBuf::from),
                "mismatch in case {i}: {input:?}"
            );
        }
    }

    #[test]
    fn common_prefix_ignores_case() {
        let result = common_prefix(&paths(&["/Lib/Shared/a.ts", "/lib/shared/b.ts"]));
        assert_eq!(result, Some(PathBuf::from("/Lib/Shared")));
    }

    #[test]
    fn common_prefix_of_nothing_is_none() {
        assert_eq!(common_prefix(&[]), None);
    }

    #[test]
    fn common_prefix_of_only_declarations_is_none() {
        let result = common_prefix(&paths(&["/a/one.d.ts", "/b/two.d.ts"]));
        assert_eq!(result, None);
    }

    #[test]
    fn declaration_files_have_no_output() {
        let target = OutputTarget::Directory(PathBuf::from("/out"));
        assert_eq!(
            output_for(Path::new("/src/types.d.ts"), Some(Path::new("/src")), &target),
            None
        );
        assert_eq!(
            output_for(Path::new("/src/TYPES.D.TS"), Some(Path::new("/src")), &target),
            None
        );
    }

    #[test]
    fn output_rebases_under_the_directory() {
        let target = OutputTarget::Directory(PathBuf::from("/out"));
        let result = output_for(
            Path::new("/proj/src/ui/panel.ts"),
            Some(Path::new("/proj/src")),
            &target,
        );
        assert_eq!(result, Some(PathBuf::from("/out/ui/panel.js")));
    }

    #[test]
    fn output_prefix_strip_is_case_insensitive() {
        let target = OutputTarget::Directory(PathBuf::from("/out"));
        let result = output_for(
            Path::new("/Proj/SRC/panel.ts"),
            Some(Path::new("/proj/src")),
            &target,
        );
        assert_eq!(result, Some(PathBuf::from("/out/panel.js")));
    }

    #[test]
    fn unmatched_prefix_keeps_the_original_directory() {
        let target = OutputTarget::Directory(PathBuf::from("/out"));
        let result = output_for(
            Path::new("/elsewhere/a.ts"),
            Some(Path::new("/proj/src")),
            &target,
        );
        assert_eq!(result, Some(PathBuf::from("/elsewhere/a.js")));
    }

    #[test]
    fn without_output_directory_the_file_stays_in_place() {
        let result = output_for(Path::new("/src/app.ts"), Some(Path::new("/src")), &OutputTarget::InPlace);
        assert_eq!(result, Some(PathBuf::from("/src/app.js")));
    }

    #[test]
    fn compound_extensions_replace_only_the_last_part() {
        let result = output_for(Path::new("/src/app.generated.ts"), None, &OutputTarget::InPlace);
        assert_eq!(result, Some(PathBuf::from("/src/app.generated.js")));
    }

    #[test]
    fn single_file_target_merges_everything() {
        let target = OutputTarget::SingleFile(PathBuf::from("/out/bundle.js"));
        assert_eq!(
            output_for(Path::new("/src/a.ts"), Some(Path::new("/src")), &target),
            Some(PathBuf::from("/out/bundle.js"))
        );
        assert_eq!(
            output_for(Path::new("/src/types.d.ts"), Some(Path::new("/src")), &target),
            None
        );
    }

    #[test]
    fn mapping_preserves_input_order_and_covers_every_input() {
        let inputs = paths(&["/src/b.ts", "/src/a.ts", "/src/types.d.ts"]);
        let target = OutputTarget::Directory(PathBuf::from("/out"));

        let mapping = output_mapping(&inputs, &target);

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping[0], (PathBuf::from("/src/b.ts"), Some(PathBuf::from("/out/b.js"))));
        assert_eq!(mapping[1], (PathBuf::from("/src/a.ts"), Some(PathBuf::from("/out/a.js"))));
        assert_eq!(mapping[2], (PathBuf::from("/src/types.d.ts"), None));
    }
}
