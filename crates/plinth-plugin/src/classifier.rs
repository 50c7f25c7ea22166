// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability predicates over plugin type and class.

use plinth_core::{Class, PluginType};

pub use plinth_core::is_valid_type;

pub fn is_app(ty: PluginType) -> bool {
    ty == PluginType::App
}

pub fn is_renderer(ty: PluginType) -> bool {
    ty == PluginType::Renderer
}

pub fn is_secrets_manager(ty: PluginType) -> bool {
    ty == PluginType::SecretsManager
}

pub fn is_core_plugin(class: Class) -> bool {
    class == Class::Core
}

pub fn is_bundled_plugin(class: Class) -> bool {
    class == Class::Bundled
}

pub fn is_external_plugin(class: Class) -> bool {
    class == Class::External
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_predicates_are_exclusive() {
        for ty in PluginType::ALL {
            let hits = [is_app(ty), is_renderer(ty), is_secrets_manager(ty)]
                .into_iter()
                .filter(|b| *b)
                .count();
            let expected = usize::from(matches!(
                ty,
                PluginType::App | PluginType::Renderer | PluginType::SecretsManager
            ));
            assert_eq!(hits, expected, "{ty}");
        }
    }

    #[test]
    fn exactly_one_class_predicate_holds() {
        for class in [Class::Core, Class::Bundled, Class::External] {
            let hits = [
                is_core_plugin(class),
                is_bundled_plugin(class),
                is_external_plugin(class),
            ]
            .into_iter()
            .filter(|b| *b)
            .count();
            assert_eq!(hits, 1, "{class}");
        }
    }

    #[test]
    fn valid_type_check_is_reexported() {
        assert!(is_valid_type("secretsmanager"));
        assert!(!is_valid_type("SecretsManager "));
    }
}
