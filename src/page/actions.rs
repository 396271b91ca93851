use anyhow::{Result, anyhow};
use std::str::FromStr;

use crate::api::Package;

/// Entries of a package card's action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageAction {
    Preview,
    Edit,
    Approve,
    Feature,
    Delete,
}

impl PackageAction {
    pub fn label(&self) -> &'static str {
        match self {
            PackageAction::Preview => "Preview",
            PackageAction::Edit => "Edit",
            PackageAction::Approve => "Approve",
            PackageAction::Feature => "Feature",
            PackageAction::Delete => "Delete",
        }
    }

    /// The state-changing request behind this entry, if any.
    pub fn mutation(&self) -> Option<Mutation> {
        match self {
            PackageAction::Approve => Some(Mutation::Approve),
            PackageAction::Feature => Some(Mutation::Feature),
            PackageAction::Delete => Some(Mutation::Delete),
            PackageAction::Preview | PackageAction::Edit => None,
        }
    }
}

impl FromStr for PackageAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preview" | "show" => Ok(PackageAction::Preview),
            "edit" => Ok(PackageAction::Edit),
            "approve" => Ok(PackageAction::Approve),
            "feature" => Ok(PackageAction::Feature),
            "delete" => Ok(PackageAction::Delete),
            other => Err(anyhow!("Unknown action '{}'", other)),
        }
    }
}

/// Menu entries offered for `pkg`. Approve only for pending packages,
/// Feature only for packages not yet featured.
pub fn available_actions(pkg: &Package) -> Vec<PackageAction> {
    let mut actions = vec![PackageAction::Preview, PackageAction::Edit];
    if pkg.is_pending() {
        actions.push(PackageAction::Approve);
    }
    if !pkg.featured {
        actions.push(PackageAction::Feature);
    }
    actions.push(PackageAction::Delete);
    actions
}

/// A write against the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Approve,
    Feature,
    Delete,
}

impl Mutation {
    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::Approve => "Package approved successfully",
            Mutation::Feature => "Package featured successfully",
            Mutation::Delete => "Package deleted successfully",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Mutation::Approve => "Failed to approve package",
            Mutation::Feature => "Failed to feature package",
            Mutation::Delete => "Failed to delete package",
        }
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Approve => f.write_str("approve"),
            Mutation::Feature => f.write_str("feature"),
            Mutation::Delete => f.write_str("delete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PackageStatus;
    use crate::test_utils::sample_package;

    #[test]
    fn test_pending_unfeatured_package_offers_everything() {
        let mut pkg = sample_package("1");
        pkg.status = PackageStatus::Pending;
        pkg.featured = false;

        assert_eq!(
            available_actions(&pkg),
            vec![
                PackageAction::Preview,
                PackageAction::Edit,
                PackageAction::Approve,
                PackageAction::Feature,
                PackageAction::Delete,
            ]
        );
    }

    #[test]
    fn test_featured_package_never_offers_feature() {
        let mut pkg = sample_package("1");
        pkg.featured = true;
        pkg.status = PackageStatus::Pending;

        let actions = available_actions(&pkg);
        assert!(!actions.contains(&PackageAction::Feature));
        assert!(actions.contains(&PackageAction::Approve));
    }

    #[test]
    fn test_non_pending_package_never_offers_approve() {
        for status in [PackageStatus::Approved, PackageStatus::Other] {
            let mut pkg = sample_package("1");
            pkg.status = status;
            assert!(!available_actions(&pkg).contains(&PackageAction::Approve));
        }
    }

    #[test]
    fn test_delete_always_offered() {
        let mut pkg = sample_package("1");
        pkg.featured = true;
        pkg.status = PackageStatus::Approved;
        assert_eq!(
            available_actions(&pkg),
            vec![
                PackageAction::Preview,
                PackageAction::Edit,
                PackageAction::Delete
            ]
        );
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("show".parse::<PackageAction>().unwrap(), PackageAction::Preview);
        assert_eq!("Approve".parse::<PackageAction>().unwrap(), PackageAction::Approve);
        assert!("publish".parse::<PackageAction>().is_err());
    }

    #[test]
    fn test_mutation_messages() {
        assert_eq!(Mutation::Approve.success_message(), "Package approved successfully");
        assert_eq!(Mutation::Feature.failure_message(), "Failed to feature package");
        assert_eq!(PackageAction::Delete.mutation(), Some(Mutation::Delete));
        assert_eq!(PackageAction::Edit.mutation(), None);
    }
}
