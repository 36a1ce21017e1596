use std::fmt::Write;

use cadence_core::{Attribution, PackageChangesets};

use crate::forge::RepositoryInfo;

const RELEASE_REQUEST_INTRO: &str = "This pull request is maintained by cadence. \
Merging it releases the package versions listed below; it is updated \
whenever new changesets land on the base branch.";

/// One package entry of a release request.
#[derive(Debug, Clone, Copy)]
pub struct PackageRelease<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub changes: &'a PackageChangesets,
}

/// Renders subsections (`Major changes`, `Minor changes`, `Patch changes`,
/// `Next changes`) at `level`, one bullet per changeset in insertion order.
#[must_use]
pub fn release_notes(
    changes: &PackageChangesets,
    level: u8,
    repository: Option<&RepositoryInfo>,
) -> String {
    let hashes = "#".repeat(usize::from(level));

    changes
        .sections()
        .map(|(change_type, changesets)| {
            let bullets: Vec<String> = changesets
                .iter()
                .map(|changeset| bullet(&changeset.content, &changeset.attribution, repository))
                .collect();
            format!(
                "{hashes} {}\n\n{}",
                change_type.section_title(),
                bullets.join("\n")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bullet(content: &str, attribution: &Attribution, repository: Option<&RepositoryInfo>) -> String {
    let pull_request = attribution.pull_request.map(|number| match repository {
        Some(repo) => format!("[#{number}]({})", repo.pull_request_url(number)),
        None => format!("#{number}"),
    });
    let author = attribution.author.as_deref().map(|login| match repository {
        Some(repo) => format!("[@{login}]({})", repo.user_url(login)),
        None => format!("@{login}"),
    });

    let prefix = match (pull_request, author) {
        (Some(pr), Some(author)) => format!("{pr} by {author}: "),
        (None, Some(author)) => format!("By {author}: "),
        (Some(pr), None) => format!("{pr}: "),
        (None, None) => String::new(),
    };

    let mut lines = content.trim().lines();
    let mut output = format!("- {prefix}{}", lines.next().unwrap_or_default());
    for line in lines {
        output.push('\n');
        if !line.trim().is_empty() {
            output.push_str("  ");
            output.push_str(line);
        }
    }
    output
}

#[must_use]
pub fn release_request_title(releases: &[PackageRelease<'_>]) -> String {
    match releases {
        [single] => format!("Release {}@{}", single.name, single.version),
        many => format!("Release {} packages", many.len()),
    }
}

/// Pull request body listing every package update, notes nested one level
/// below the package heading.
#[must_use]
pub fn release_request_body(
    releases: &[PackageRelease<'_>],
    repository: Option<&RepositoryInfo>,
) -> String {
    let mut body = format!("{RELEASE_REQUEST_INTRO}\n\n## Releases\n");

    for release in releases {
        let _ = write!(
            body,
            "\n### {}@{}\n\n{}\n",
            release.name,
            release.version,
            release_notes(release.changes, 4, repository)
        );
    }

    body
}
