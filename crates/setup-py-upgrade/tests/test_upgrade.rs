use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use setup_py_upgrade::{Config, SETUP_PY_STUB, UpgradeError, upgrade};
use tempfile::TempDir;

/// Write `setup.py` (and optionally `setup.cfg`) into a fresh project directory
fn project(setup_py: &str, setup_cfg: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("setup.py"), setup_py).unwrap();
    if let Some(setup_cfg) = setup_cfg {
        fs::write(temp_dir.path().join("setup.cfg"), setup_cfg).unwrap();
    }
    temp_dir
}

fn run(dir: &Path) -> Result<(), UpgradeError> {
    upgrade(&Config::for_directory(dir)).map(|_| ())
}

fn read_cfg(dir: &Path) -> String {
    fs::read_to_string(dir.join("setup.cfg")).unwrap()
}

/// Upgrade a project that has no setup.cfg and return the written document
fn upgrade_source(setup_py: &str) -> String {
    let dir = project(setup_py, None);
    run(dir.path()).unwrap();
    read_cfg(dir.path())
}

#[test]
fn test_basic() {
    let dir = project("from setuptools import setup\nsetup(name=\"foo\")\n", None);
    let report = upgrade(&Config::for_directory(dir.path())).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("setup.py")).unwrap(), SETUP_PY_STUB);
    assert_eq!(read_cfg(dir.path()), "[metadata]\nname = foo\n");
    assert_eq!(report.setup_cfg, dir.path().join("setup.cfg"));
    assert_eq!(report.contents, "[metadata]\nname = foo\n");
}

#[test]
fn test_non_from_import_setuptools() {
    assert_eq!(
        upgrade_source("import setuptools\nsetuptools.setup(name=\"foo\")\n"),
        "[metadata]\nname = foo\n"
    );
}

#[test]
fn test_reads_file() {
    let cfg = upgrade_source(concat!(
        "from setuptools import setup\n",
        "with open(\"README.md\") as f:\n",
        "    readme = f.read()\n",
        "setup(name=\"foo\", long_description=readme)",
    ));
    assert_eq!(cfg, "[metadata]\nname = foo\nlong_description = file: README.md\n");
}

#[test]
fn test_unrelated_with_statement() {
    let cfg = upgrade_source(concat!(
        "import contextlib\n",
        "from setuptools import setup\n",
        "with contextlib.suppress(ImportError):\n",
        "    import dne\n",
        "setup(name=\"foo\")\n",
    ));
    assert_eq!(cfg, "[metadata]\nname = foo\n");
}

#[test]
fn test_option_key() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", install_requires=[\"astpretty\", \"six\"])\n",
    );
    insta::assert_snapshot!(cfg, @r"
    [metadata]
    name = foo

    [options]
    install_requires =
        astpretty
        six
    ");
    assert!(cfg.ends_with("    six\n"));
}

#[test]
fn test_single_element_list_is_scalar() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", install_requires=[\"six\"], zip_safe=False)\n",
    );
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options]\ninstall_requires = six\nzip_safe = False\n"
    );
}

#[test]
fn test_unsupported_argument() {
    let setup_py = concat!(
        "from setuptools import Extension, setup\n",
        "setup(name=\"foo\", ext_modules=[Extension(\"_x\", [\"_x.c\"])])\n",
    );
    let dir = project(setup_py, None);
    let err = run(dir.path()).unwrap_err();

    assert_eq!(err.to_string(), "ext_modules= is not supported in setup.cfg");
    assert_eq!(fs::read_to_string(dir.path().join("setup.py")).unwrap(), setup_py);
    assert!(!dir.path().join("setup.cfg").exists());
}

#[test]
fn test_intentionally_not_parsable() {
    let setup_py = concat!(
        "from setuptools import setup\n",
        "from foo import __version__\n",
        "setup(name=\"foo\", version=__version__)\n",
    );
    let existing = "[bdist_wheel]\nuniversal = 1\n";
    let dir = project(setup_py, Some(existing));
    let err = run(dir.path()).unwrap_err();

    assert_eq!(err.to_string(), "unparsable: version=");
    assert_eq!(fs::read_to_string(dir.path().join("setup.py")).unwrap(), setup_py);
    assert_eq!(read_cfg(dir.path()), existing);
}

#[test]
fn test_syntax_error_leaves_files_untouched() {
    let setup_py = "from setuptools import setup\nsetup(name=\"foo\"\n";
    let dir = project(setup_py, None);
    let err = run(dir.path()).unwrap_err();

    assert!(matches!(err, UpgradeError::Parse { .. }), "got {err:?}");
    assert_eq!(fs::read_to_string(dir.path().join("setup.py")).unwrap(), setup_py);
}

#[test]
fn test_missing_setup_py() {
    let dir = TempDir::new().unwrap();
    let err = run(dir.path()).unwrap_err();
    assert!(matches!(err, UpgradeError::Io { .. }), "got {err:?}");
    assert!(!dir.path().join("setup.cfg").exists());
}

#[test]
fn test_failed_setup_cfg_write_keeps_setup_py() {
    let setup_py = "from setuptools import setup\nsetup(name=\"foo\", version=\"1.0\")\n";
    let dir = project(setup_py, None);
    let config = Config {
        setup_cfg: "missing-dir/setup.cfg".to_string(),
        ..Config::for_directory(dir.path())
    };
    let err = upgrade(&config).unwrap_err();

    let UpgradeError::Io { path, .. } = &err else {
        panic!("expected an io error, got {err:?}");
    };
    assert_eq!(path, &dir.path().join("missing-dir/setup.cfg"));
    assert_eq!(fs::read_to_string(dir.path().join("setup.py")).unwrap(), setup_py);
    assert!(!dir.path().join("missing-dir").exists());
}

#[test]
fn test_find_packages() {
    let cfg = upgrade_source(concat!(
        "from setuptools import find_packages, setup\n",
        "setup(name=\"foo\", packages=find_packages(exclude=(\"tests*\",)))\n",
    ));
    assert_eq!(
        cfg,
        concat!(
            "[metadata]\n",
            "name = foo\n",
            "\n",
            "[options]\n",
            "packages = find:\n",
            "\n",
            "[options.packages.find]\n",
            "exclude = tests*\n",
        )
    );
}

#[test]
fn test_package_dir() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", package_dir={\"\": \"src\", \"pkg1\": \"pkg1\"})\n",
    );
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options]\npackage_dir =\n    =src\n    pkg1=pkg1\n"
    );
}

#[test]
fn test_project_urls() {
    let cfg = upgrade_source(concat!(
        "from setuptools import setup\n",
        "setup(\n",
        "    name=\"foo\",\n",
        "    project_urls={\"homepage\": \"https://example.com\"},\n",
        ")\n",
    ));
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\nproject_urls =\n    homepage=https://example.com\n"
    );
}

#[test]
fn test_project_urls_multiple() {
    let cfg = upgrade_source(concat!(
        "from setuptools import setup\n",
        "setup(\n",
        "    name=\"foo\",\n",
        "    project_urls={\n",
        "        \"homepage\": \"https://example.com\",\n",
        "        \"issues\": \"https://example.com/issues\",\n",
        "    },\n",
        ")\n",
    ));
    assert_eq!(
        cfg,
        concat!(
            "[metadata]\n",
            "name = foo\n",
            "project_urls =\n",
            "    homepage=https://example.com\n",
            "    issues=https://example.com/issues\n",
        )
    );
}

#[test]
fn test_repeated_literal_entries_collapse() {
    let cfg = upgrade_source(concat!(
        "from setuptools import setup\n",
        "setup(\n",
        "    name=\"foo\",\n",
        "    classifiers={\"Typing :: Typed\", \"Typing :: Typed\"},\n",
        "    project_urls={\"homepage\": \"https://old.example.com\", \"homepage\": \"https://example.com\"},\n",
        ")\n",
    ));
    assert_eq!(
        cfg,
        concat!(
            "[metadata]\n",
            "name = foo\n",
            "classifiers = Typing :: Typed\n",
            "project_urls =\n",
            "    homepage=https://example.com\n",
        )
    );
}

#[test]
fn test_entry_points() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", entry_points={\"console_scripts\": [\"a=a:main\"]})\n",
    );
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options.entry_points]\nconsole_scripts =\n    a=a:main\n"
    );
}

#[test]
fn test_extras_to_requirements_rewrite() {
    let cfg = upgrade_source(concat!(
        "from setuptools import setup\n",
        "setup(\n",
        "    name=\"foo\",\n",
        "    extras_require={':python_version==\"2.7\"': ['typing']}\n",
        ")\n",
    ));
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options]\ninstall_requires = typing;python_version==\"2.7\"\n"
    );
}

#[test]
fn test_normal_extras() {
    let cfg = upgrade_source(concat!(
        "from setuptools import setup\n",
        "setup(\n",
        "    name=\"foo\",\n",
        "    extras_require={'lint': ['pre-commit']},\n",
        ")\n",
    ));
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options.extras_require]\nlint = pre-commit\n"
    );
}

#[test]
fn test_empty_string_package_data() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", package_data={\"\": [\"*.pyi\"]})\n",
    );
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options.package_data]\n* =\n    *.pyi\n"
    );
}

#[test]
fn test_empty_string_exclude_package_data() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", exclude_package_data={\"\": [\"*.tar.gz\"]})\n",
    );
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options.exclude_package_data]\n* =\n    *.tar.gz\n"
    );
}

#[test]
fn test_package_data_multiple_entries() {
    let cfg = upgrade_source(
        "from setuptools import setup\nsetup(name=\"foo\", package_data={\"resources\": [\"*.json\", \"*.pyi\"]})\n",
    );
    assert_eq!(
        cfg,
        "[metadata]\nname = foo\n\n[options.package_data]\nresources =\n    *.json\n    *.pyi\n"
    );
}

#[test]
fn test_updates_existing_setup_cfg() {
    let dir = project(
        "from setuptools import setup\nsetup(name=\"foo\")\n",
        Some("[metadata]\nlicense_file = LICENSE\n\n[bdist_wheel]\nuniversal = 1\n"),
    );
    run(dir.path()).unwrap();
    assert_eq!(
        read_cfg(dir.path()),
        "[metadata]\nname = foo\nlicense_file = LICENSE\n\n[bdist_wheel]\nuniversal = 1\n"
    );
}

#[test]
fn test_extracted_values_win_over_existing() {
    let dir = project(
        "from setuptools import setup\nsetup(name=\"foo\", version=\"2.0\")\n",
        Some("[metadata]\nname = old-name\nversion = 1.0\nauthor = someone\n"),
    );
    run(dir.path()).unwrap();
    assert_eq!(
        read_cfg(dir.path()),
        "[metadata]\nname = foo\nversion = 2.0\nauthor = someone\n"
    );
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = project(
        concat!(
            "from setuptools import find_packages, setup\n",
            "setup(\n",
            "    name=\"foo\",\n",
            "    install_requires=[\"astpretty\", \"six\"],\n",
            "    packages=find_packages(exclude=(\"tests*\",)),\n",
            "    entry_points={\"console_scripts\": [\"a=a:main\"]},\n",
            ")\n",
        ),
        Some("[bdist_wheel]\nuniversal = 1\n"),
    );
    run(dir.path()).unwrap();
    let first = read_cfg(dir.path());

    run(dir.path()).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("setup.py")).unwrap(), SETUP_PY_STUB);
    assert_eq!(read_cfg(dir.path()), first);
    assert!(first.ends_with("[bdist_wheel]\nuniversal = 1\n"));
}

#[test]
fn test_custom_file_names() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build_setup.py"),
        "import setuptools\nsetuptools.setup(name=\"foo\")\n",
    )
    .unwrap();
    let config = Config {
        setup_py: "build_setup.py".to_string(),
        setup_cfg: "build.cfg".to_string(),
        ..Config::for_directory(dir.path())
    };
    upgrade(&config).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("build.cfg")).unwrap(),
        "[metadata]\nname = foo\n"
    );
    assert!(!dir.path().join("setup.cfg").exists());
}
