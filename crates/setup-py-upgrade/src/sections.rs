//! Post-processing of extracted sections into setup.cfg text values
//!
//! Extraction produces Python values keyed by `setup()` keyword. setup.cfg
//! wants some of those as their own sections, has no syntax for
//! environment-marker extras, and writes lists as indented continuation
//! lines. This module performs those rewrites in a fixed order:
//!
//! 1. promote dict-valued `entry_points`, `extras_require`, `package_data`
//!    and `exclude_package_data` to `[options.<key>]`
//! 2. fold `extras_require` keys starting with `:` into `install_requires`
//! 3. drop empty sections
//! 4. render values: sequences and dicts become one line or a block
//! 5. force block values and the `*` key in the entry-point and
//!    package-data sections

use log::debug;

use crate::keywords::{OPTIONS_AS_SECTIONS, SectionKind, WILDCARD_SECTIONS};
use crate::types::{FxIndexMap, Literal, RenderedSections, SectionMap};

const EXTRAS_SECTION: &str = "options.extras_require";
const INSTALL_REQUIRES: &str = "install_requires";
const PACKAGE_DIR: &str = "package_dir";

/// Run every post-processing step over freshly extracted sections
pub fn postprocess(mut sections: SectionMap) -> RenderedSections {
    promote_option_sections(&mut sections);
    rewrite_conditional_extras(&mut sections);
    sections.retain(|name, section| {
        if section.is_empty() {
            debug!("Dropping empty section [{name}]");
        }
        !section.is_empty()
    });

    let mut rendered: RenderedSections = sections
        .into_iter()
        .map(|(name, section)| {
            let section = section
                .into_iter()
                .map(|(key, value)| {
                    let text = render_value(&key, &value);
                    (key, text)
                })
                .collect::<FxIndexMap<_, _>>();
            (name, section)
        })
        .collect();

    for name in WILDCARD_SECTIONS {
        if let Some(section) = rendered.get_mut(*name) {
            force_block_values(section);
        }
    }

    rendered
}

/// Move dict-valued options that setup.cfg spells as sections into
/// `[options.<key>]`
fn promote_option_sections(sections: &mut SectionMap) {
    let options_name = SectionKind::Options.section_name();
    for key in OPTIONS_AS_SECTIONS {
        let Some(options) = sections.get_mut(options_name) else {
            return;
        };
        let Some(Literal::Dict(_)) = options.get(*key) else {
            continue;
        };
        let Some(Literal::Dict(items)) = options.shift_remove(*key) else {
            continue;
        };

        let section = items
            .into_iter()
            .map(|(entry, value)| (entry.to_config_text(), value))
            .collect::<FxIndexMap<_, _>>();
        debug!("Promoting {key}= to [options.{key}] with {} entries", section.len());
        sections.insert(format!("{options_name}.{key}"), section);
    }
}

/// `extras_require={':python_version=="2.7"': ['typing']}` has no setup.cfg
/// spelling; it becomes `install_requires = typing;python_version=="2.7"`
fn rewrite_conditional_extras(sections: &mut SectionMap) {
    let Some(extras) = sections.get_mut(EXTRAS_SECTION) else {
        return;
    };

    let conditional_keys: Vec<String> = extras
        .keys()
        .filter(|key| key.starts_with(':'))
        .cloned()
        .collect();
    if conditional_keys.is_empty() {
        return;
    }

    let mut requirements = Vec::new();
    for key in conditional_keys {
        let Some(deps) = extras.shift_remove(&key) else {
            continue;
        };
        let marker = &key[1..];
        for dep in dependency_strings(deps) {
            requirements.push(Literal::Str(format!("{dep};{marker}")));
        }
    }

    let options = sections
        .entry(SectionKind::Options.section_name().to_string())
        .or_default();
    let install_requires = options
        .entry(INSTALL_REQUIRES.to_string())
        .or_insert_with(|| Literal::List(Vec::new()));
    debug!(
        "Appending {} conditional requirement(s) to {INSTALL_REQUIRES}",
        requirements.len()
    );
    let mut list = into_list(std::mem::replace(install_requires, Literal::None));
    list.extend(requirements);
    *install_requires = Literal::List(list);
}

/// Requirement strings named by an extras entry
fn dependency_strings(deps: Literal) -> Vec<String> {
    match deps {
        Literal::List(elts) | Literal::Tuple(elts) | Literal::Set(elts) => {
            elts.iter().map(Literal::to_config_text).collect()
        }
        other => vec![other.to_config_text()],
    }
}

/// Existing `install_requires` may be a tuple or a single string
fn into_list(value: Literal) -> Vec<Literal> {
    match value {
        Literal::List(elts) | Literal::Tuple(elts) | Literal::Set(elts) => elts,
        other => vec![other],
    }
}

/// Render one extracted value as setup.cfg text
fn render_value(key: &str, value: &Literal) -> String {
    if let Some(elts) = value.as_sequence() {
        return list_as_str(elts.iter().map(Literal::to_config_text).collect());
    }
    if let Literal::Dict(items) = value {
        let lines: Vec<String> = items
            .iter()
            .map(|(k, v)| format!("{}={}", k.to_config_text(), v.to_config_text()))
            .collect();
        // `package_dir = =src` is valid; `project_urls` always starts a block
        return if key == PACKAGE_DIR {
            list_as_str(lines)
        } else {
            block(&lines)
        };
    }
    value.to_config_text()
}

/// One element stays on the key's line, several become a block
fn list_as_str(mut items: Vec<String>) -> String {
    if items.len() == 1 {
        items.swap_remove(0)
    } else {
        block(&items)
    }
}

/// A leading newline makes every item an indented continuation line
fn block(items: &[String]) -> String {
    format!("\n{}", items.join("\n"))
}

/// Every value starts on its own line and the empty key becomes `*`
fn force_block_values(section: &mut FxIndexMap<String, String>) {
    *section = std::mem::take(section)
        .into_iter()
        .map(|(key, value)| {
            let key = if key.is_empty() { "*".to_string() } else { key };
            let value = if value.starts_with('\n') {
                value
            } else {
                format!("\n{value}")
            };
            (key, value)
        })
        .collect();
}
