//! Classification of `setup()` keywords into `setup.cfg` sections
//!
//! The tables are fixed: a keyword either belongs to `[metadata]`, belongs
//! to `[options]`, or cannot be expressed in `setup.cfg` at all.

/// Keywords written to `[metadata]`
pub const METADATA_KEYS: &[&str] = &[
    "name",
    "version",
    "url",
    "download_url",
    "project_urls",
    "author",
    "author_email",
    "maintainer",
    "maintainer_email",
    "classifiers",
    "license",
    "license_file",
    "description",
    "long_description",
    "long_description_content_type",
    "keywords",
    "platforms",
    "provides",
    "requires",
    "obsoletes",
];

/// Options that become their own `[options.<key>]` section
pub const OPTIONS_AS_SECTIONS: &[&str] = &[
    "entry_points",
    "extras_require",
    "package_data",
    "exclude_package_data",
];

/// Keywords written to `[options]` (besides [`OPTIONS_AS_SECTIONS`])
pub const OPTIONS_KEYS: &[&str] = &[
    "zip_safe",
    "setup_requires",
    "install_requires",
    "python_requires",
    "use_2to3",
    "use_2to3_fixers",
    "use_2to3_exclude_fixers",
    "convert_2to3_doctests",
    "scripts",
    "eager_resources",
    "dependency_links",
    "tests_require",
    "include_package_data",
    "packages",
    "package_dir",
    "namespace_packages",
    "py_modules",
    "data_files",
];

/// Positional parameter names of `find_packages()`
pub const FIND_PACKAGES_ARGS: &[&str] = &["where", "exclude", "include"];

/// Section holding `find_packages()` arguments
pub const PACKAGES_FIND_SECTION: &str = "options.packages.find";

/// Options sections whose values always start on their own line and whose
/// empty key means "all packages"
pub const WILDCARD_SECTIONS: &[&str] = &[
    "options.entry_points",
    "options.package_data",
    "options.exclude_package_data",
];

/// Section a recognized keyword belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Metadata,
    Options,
}

impl SectionKind {
    /// Classify a `setup()` keyword, `None` when setup.cfg has no equivalent
    pub fn classify(keyword: &str) -> Option<Self> {
        if METADATA_KEYS.contains(&keyword) {
            Some(Self::Metadata)
        } else if OPTIONS_KEYS.contains(&keyword) || OPTIONS_AS_SECTIONS.contains(&keyword) {
            Some(Self::Options)
        } else {
            None
        }
    }

    pub fn section_name(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Options => "options",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.section_name())
    }
}

/// Package discovery helpers accepted as a `packages=` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryHelper {
    FindPackages,
    FindNamespacePackages,
}

impl DiscoveryHelper {
    pub const ALL: [Self; 2] = [Self::FindPackages, Self::FindNamespacePackages];

    pub fn function_name(self) -> &'static str {
        match self {
            Self::FindPackages => "find_packages",
            Self::FindNamespacePackages => "find_namespace_packages",
        }
    }

    /// Value setup.cfg uses to defer discovery to configuration time
    pub fn sentinel(self) -> &'static str {
        match self {
            Self::FindPackages => "find:",
            Self::FindNamespacePackages => "find_namespace:",
        }
    }
}
