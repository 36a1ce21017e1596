//! Assigning pending changesets to packages and looking up who wrote them.

use std::collections::HashSet;
use std::path::Path;

use cadence_core::{Attribution, ChangeType, Changeset, Package, PackageChangesets, RawChangeset};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::traits::ForgeClient;
use crate::{DropReason, DroppedChangeset, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Keyed by package name, in order of first appearance.
    pub packages: IndexMap<String, PackageChangesets>,
    pub dropped: Vec<DroppedChangeset>,
}

impl Classification {
    #[must_use]
    pub fn changeset_count(&self) -> usize {
        self.packages.values().map(PackageChangesets::len).sum()
    }
}

/// Buckets each changeset under its package and change type, keeping input
/// order inside every bucket.
///
/// Changesets with an unknown type, no package, or a package that does not
/// exist are dropped with a warning. A declared pull request number is kept
/// as attribution; nothing else is looked up here.
#[must_use]
pub fn classify(raw: &[RawChangeset], packages: &[Package]) -> Classification {
    let known: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    let mut classification = Classification::default();

    for changeset in raw {
        match validate(changeset, &known) {
            Ok((package, change_type)) => {
                classification
                    .packages
                    .entry(package.to_string())
                    .or_default()
                    .push(Changeset {
                        id: changeset.id.clone(),
                        change_type,
                        package: package.to_string(),
                        content: changeset.body.clone(),
                        path: changeset.path.clone(),
                        attribution: Attribution {
                            author: None,
                            pull_request: changeset.pull_request,
                        },
                    });
            }
            Err(reason) => {
                warn!(changeset = %changeset.id, %reason, "skipping changeset");
                classification.dropped.push(DroppedChangeset {
                    id: changeset.id.clone(),
                    path: changeset.path.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        classified = classification.changeset_count(),
        dropped = classification.dropped.len(),
        "classified changesets"
    );
    classification
}

fn validate<'a>(
    changeset: &'a RawChangeset,
    known: &HashSet<&str>,
) -> std::result::Result<(&'a str, ChangeType), DropReason> {
    let change_type: ChangeType = changeset
        .type_text
        .trim()
        .parse()
        .map_err(|_| DropReason::UnknownType(changeset.type_text.clone()))?;

    let package = changeset
        .package
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(DropReason::MissingPackage)?;

    if !known.contains(package) {
        return Err(DropReason::UnknownPackage(package.to_string()));
    }

    Ok((package, change_type))
}

/// Fills in author and pull request for every changeset, one forge round
/// trip chain per changeset, run in parallel.
///
/// Lookups that fail or find nothing leave the attribution partial; the
/// changelog then omits the missing link.
pub fn attribute<'a, F>(forge: &F, changesets: impl Iterator<Item = &'a mut Changeset>)
where
    F: ForgeClient + ?Sized,
{
    let mut changesets: Vec<&mut Changeset> = changesets.collect();

    changesets.par_iter_mut().for_each(|changeset| {
        changeset.attribution = lookup_attribution(forge, changeset);
    });
}

fn lookup_attribution<F>(forge: &F, changeset: &Changeset) -> Attribution
where
    F: ForgeClient + ?Sized,
{
    let result = match changeset.attribution.pull_request {
        Some(number) => attribution_from_pull_request(forge, number),
        None => attribution_from_history(forge, &changeset.path),
    };

    match result {
        Ok(attribution) => {
            if attribution.is_unknown() {
                debug!(changeset = %changeset.id, "no attribution found");
            }
            attribution
        }
        Err(e) => {
            warn!(changeset = %changeset.id, error = %e, "attribution lookup failed");
            Attribution {
                author: None,
                pull_request: changeset.attribution.pull_request,
            }
        }
    }
}

fn attribution_from_pull_request<F>(forge: &F, number: u64) -> Result<Attribution>
where
    F: ForgeClient + ?Sized,
{
    let pr = forge.find_pull_request_by_number(number)?;
    Ok(Attribution {
        author: pr.author,
        pull_request: Some(pr.number),
    })
}

fn attribution_from_history<F>(forge: &F, path: &Path) -> Result<Attribution>
where
    F: ForgeClient + ?Sized,
{
    let path = forge_path(path);
    let Some(commit) = forge.find_commit_for_file(&path)? else {
        return Ok(Attribution::default());
    };

    let pull_request = forge.find_pull_request_for_commit(&commit.sha)?;
    Ok(Attribution {
        author: commit.author,
        pull_request: pull_request.map(|pr| pr.number),
    })
}

/// Repository paths use `/` regardless of platform.
fn forge_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockForge, make_package, make_raw, pull_request};

    fn packages() -> Vec<Package> {
        vec![make_package("widgets", "1.2.0"), make_package("gadgets", "0.4.0")]
    }

    #[test]
    fn buckets_by_package_and_type_in_input_order() {
        let raw = vec![
            make_raw("a", "widgets", "patch", "fix one"),
            make_raw("b", "gadgets", "minor", "gadget feature"),
            make_raw("c", "widgets", "minor", "widget feature"),
            make_raw("d", "widgets", "patch", "fix two"),
        ];

        let classification = classify(&raw, &packages());

        let names: Vec<&str> = classification.packages.keys().map(String::as_str).collect();
        assert_eq!(names, ["widgets", "gadgets"]);

        let widgets = &classification.packages["widgets"];
        let patches: Vec<&str> = widgets
            .get(ChangeType::Patch)
            .iter()
            .map(|c| c.content.as_str())
            .collect();
        assert_eq!(patches, ["fix one", "fix two"]);
        assert_eq!(widgets.get(ChangeType::Minor).len(), 1);
        assert!(classification.dropped.is_empty());
    }

    #[test]
    fn unknown_package_and_type_are_dropped_not_fatal() {
        let mut no_package = make_raw("e", "widgets", "patch", "orphan");
        no_package.package = None;
        let raw = vec![
            make_raw("a", "widgets", "minor", "kept"),
            make_raw("b", "Widgets", "patch", "wrong case"),
            make_raw("c", "widgets", "huge", "bad type"),
            make_raw("d", "sprockets", "major", "unknown package"),
            no_package,
        ];

        let classification = classify(&raw, &packages());

        assert_eq!(classification.changeset_count(), 1);
        assert_eq!(classification.packages["widgets"].len(), 1);
        assert!(!classification.packages.contains_key("sprockets"));
        let reasons: Vec<&DropReason> = classification.dropped.iter().map(|d| &d.reason).collect();
        assert_eq!(
            reasons,
            [
                &DropReason::UnknownPackage("Widgets".to_string()),
                &DropReason::UnknownType("huge".to_string()),
                &DropReason::UnknownPackage("sprockets".to_string()),
                &DropReason::MissingPackage,
            ]
        );
    }

    #[test]
    fn next_type_is_recognized() {
        let raw = vec![make_raw("a", "widgets", "next", "prerelease work")];

        let classification = classify(&raw, &packages());

        assert!(classification.packages["widgets"].has_next());
    }

    #[test]
    fn declared_pull_request_is_kept() {
        let mut raw = make_raw("a", "widgets", "patch", "fix");
        raw.pull_request = Some(42);

        let classification = classify(&[raw], &packages());

        let changeset = &classification.packages["widgets"].get(ChangeType::Patch)[0];
        assert_eq!(changeset.attribution.pull_request, Some(42));
    }

    #[test]
    fn attribution_from_commit_history() {
        let raw = vec![make_raw("brave-fox", "widgets", "minor", "feature")];
        let mut classification = classify(&raw, &packages());
        let forge = MockForge::new()
            .with_commit(".changeset/brave-fox.md", "abc", "alice")
            .with_commit_pull_request("abc", pull_request(42, "alice"));

        attribute(
            &forge,
            classification.packages.values_mut().flat_map(PackageChangesets::iter_mut),
        );

        let changeset = &classification.packages["widgets"].get(ChangeType::Minor)[0];
        assert_eq!(changeset.attribution.author.as_deref(), Some("alice"));
        assert_eq!(changeset.attribution.pull_request, Some(42));
    }

    #[test]
    fn attribution_from_declared_pull_request() {
        let mut raw = make_raw("a", "widgets", "patch", "fix");
        raw.pull_request = Some(7);
        let mut classification = classify(&[raw], &packages());
        let forge = MockForge::new().with_pull_request(pull_request(7, "bob"));

        attribute(
            &forge,
            classification.packages.values_mut().flat_map(PackageChangesets::iter_mut),
        );

        let changeset = &classification.packages["widgets"].get(ChangeType::Patch)[0];
        assert_eq!(changeset.attribution.author.as_deref(), Some("bob"));
        assert_eq!(changeset.attribution.pull_request, Some(7));
    }

    #[test]
    fn failed_lookup_degrades_without_affecting_others() {
        let raw = vec![
            make_raw("broken", "widgets", "patch", "fix"),
            make_raw("fine", "widgets", "patch", "other fix"),
        ];
        let mut classification = classify(&raw, &packages());
        let forge = MockForge::new()
            .failing_for_path(".changeset/broken.md")
            .with_commit(".changeset/fine.md", "def", "carol");

        attribute(
            &forge,
            classification.packages.values_mut().flat_map(PackageChangesets::iter_mut),
        );

        let patches = classification.packages["widgets"].get(ChangeType::Patch);
        assert!(patches[0].attribution.is_unknown());
        assert_eq!(patches[1].attribution.author.as_deref(), Some("carol"));
        assert_eq!(patches[1].attribution.pull_request, None);
    }

    #[test]
    fn forge_paths_use_forward_slashes() {
        assert_eq!(
            forge_path(&Path::new(".changeset").join("brave-fox.md")),
            ".changeset/brave-fox.md"
        );
    }
}
