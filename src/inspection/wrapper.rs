//! Outdated Gradle wrapper

use crate::domain::{compare_outdatedness, GradleVersion, Outdatedness};
use crate::inspection::{Diagnostic, InspectionKind, ProblemLevel, QuickFix};
use crate::wrapper::WrapperProperties;

/// Highlight level of a wrapper whose version compares as `outdatedness`
pub fn wrapper_level(outdatedness: Outdatedness) -> Option<ProblemLevel> {
    match outdatedness {
        Outdatedness::MajorDiff => Some(ProblemLevel::Deprecated),
        Outdatedness::MinorDiff => Some(ProblemLevel::Warning),
        Outdatedness::RevisionDiff => Some(ProblemLevel::WeakWarning),
        Outdatedness::CurrentNewer => Some(ProblemLevel::Error),
        Outdatedness::Equal => None,
    }
}

/// Report the wrapper version against `latest`, with a fix writing `latest` into the URL
pub fn inspect_wrapper(wrapper: &WrapperProperties, latest: &GradleVersion) -> Option<Diagnostic> {
    let outdatedness = compare_outdatedness(&wrapper.version, latest);
    let level = wrapper_level(outdatedness)?;

    let message = if outdatedness == Outdatedness::CurrentNewer {
        format!(
            "Gradle {} is newer than the latest release {}",
            wrapper.version, latest
        )
    } else {
        format!(
            "Gradle {} is outdated, the latest version is {}",
            wrapper.version, latest
        )
    };

    let diagnostic = Diagnostic::new(
        InspectionKind::OutdatedWrapper,
        level,
        message,
        wrapper.distribution_url.value_range.clone(),
    );
    Some(match wrapper.upgrade_edit(latest) {
        Some(edit) => diagnostic.with_fix(QuickFix::rewrite(
            format!("Change Gradle version to {}", latest),
            vec![edit],
        )),
        None => diagnostic,
    })
}
