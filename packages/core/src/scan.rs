//! ClassRegistryScanner: filtered single-pass discovery.
//!
//! Both scans are lazy and one-shot. The registry (or catalog) is walked
//! once per call and each candidate runs through the predicates cheapest
//! first, stopping at the first that rejects it. Result order is whatever
//! the host iterates in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::class::{ClassDescriptor, ClassRegistry, RegistryExt};
use crate::naming::{self, names_equivalent};
use crate::object_path::{ObjectPath, SCRIPT_ROOT};
use crate::store::{AssetCatalog, AssetEntry, AssetQuery};
use crate::taxonomy::{self, Taxonomy};

/// Fixed conventions the scanner filters with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Every native match must descend from this class.
    pub native_root: String,
    /// Infrastructure modules hidden unless engine origin is included.
    pub engine_modules: Vec<String>,
    pub module_delimiter: String,
    /// Suffix of compiled shadow classes; always excluded.
    pub generated_suffix: String,
    pub stale_prefix: String,
    pub transient_namespace: String,
    /// Package root of the composite scan when no path filter is given.
    pub composite_root: String,
    pub interface_prefix: String,
    pub type_prefixes: Vec<char>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            native_root: taxonomy::ACTOR.to_string(),
            engine_modules: [
                "Engine",
                "CoreUObject",
                "UMG",
                "AIModule",
                "NavigationSystem",
                "PhysicsCore",
                "EnhancedInput",
                "InputCore",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            module_delimiter: SCRIPT_ROOT.to_string(),
            generated_suffix: "_C".to_string(),
            stale_prefix: "REINST_".to_string(),
            transient_namespace: "/Engine/Transient.".to_string(),
            composite_root: "/Game".to_string(),
            interface_prefix: "BPI_".to_string(),
            type_prefixes: naming::TYPE_PREFIXES.to_vec(),
        }
    }
}

/// Per-request filters. All optional and AND-combined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanFilters {
    /// Ancestor class name, with the type prefix optional.
    pub ancestry: Option<String>,
    /// Exact defining module.
    pub module: Option<String>,
    /// Package root of the composite scan.
    pub path: Option<String>,
    pub taxonomy: Option<Taxonomy>,
    pub include_engine_origin: bool,
    pub exclude_stale: bool,
}

impl Default for ScanFilters {
    fn default() -> Self {
        Self {
            ancestry: None,
            module: None,
            path: None,
            taxonomy: None,
            include_engine_origin: false,
            exclude_stale: true,
        }
    }
}

fn non_empty(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    (!s.is_empty()).then_some(s)
}

impl ScanFilters {
    #[must_use]
    pub fn ancestry(mut self, name: impl Into<String>) -> Self {
        self.ancestry = non_empty(name);
        self
    }

    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = non_empty(module);
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = non_empty(path);
        self
    }

    #[must_use]
    pub fn taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    #[must_use]
    pub fn include_engine_origin(mut self, include: bool) -> Self {
        self.include_engine_origin = include;
        self
    }

    #[must_use]
    pub fn exclude_stale(mut self, exclude: bool) -> Self {
        self.exclude_stale = exclude;
        self
    }
}

/// A native class that passed every filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassMatch {
    pub name: String,
    pub path: String,
    /// Direct parent name, empty for roots.
    pub parent: String,
    pub module: String,
}

/// A composite definition that passed every filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompositeMatch {
    pub name: String,
    pub path: String,
    pub parent: String,
    pub module: String,
}

/// Discovers classes and composite definitions.
pub struct ClassRegistryScanner<'a, R: ?Sized> {
    registry: &'a R,
    config: &'a ScanConfig,
}

impl<'a, R: ClassRegistry + ?Sized> ClassRegistryScanner<'a, R> {
    pub fn new(registry: &'a R, config: &'a ScanConfig) -> Self {
        Self { registry, config }
    }

    /// Lazily scan native classes.
    pub fn scan_native(&self, filters: &'a ScanFilters) -> NativeScan<'a, R> {
        debug!(
            root = %self.config.native_root,
            module = ?filters.module,
            ancestry = ?filters.ancestry,
            "scanning native classes"
        );
        NativeScan {
            classes: self.registry.classes(),
            registry: self.registry,
            config: self.config,
            filters,
        }
    }

    /// Lazily scan composite definitions listed by `catalog`.
    pub fn scan_composite<C: AssetCatalog + ?Sized>(
        &self,
        catalog: &'a C,
        filters: &'a ScanFilters,
    ) -> CompositeScan<'a, R> {
        let root = filters
            .path
            .clone()
            .unwrap_or_else(|| self.config.composite_root.clone());
        debug!(%root, taxonomy = ?filters.taxonomy, "scanning composite definitions");
        CompositeScan {
            entries: catalog.query(&AssetQuery::recursive(root)),
            registry: self.registry,
            config: self.config,
            filters,
        }
    }
}

/// Iterator returned by [`ClassRegistryScanner::scan_native`].
pub struct NativeScan<'a, R: ?Sized> {
    classes: Box<dyn Iterator<Item = &'a ClassDescriptor> + 'a>,
    registry: &'a R,
    config: &'a ScanConfig,
    filters: &'a ScanFilters,
}

impl<'a, R: ClassRegistry + ?Sized> NativeScan<'a, R> {
    fn accepts(&self, class: &ClassDescriptor) -> bool {
        let config = self.config;
        let filters = self.filters;

        if !self.registry.is_child_of_path(class, &config.native_root) {
            return false;
        }

        let module = module_of(&class.path, &config.module_delimiter);
        if !filters.include_engine_origin
            && module.is_some_and(|m| config.engine_modules.iter().any(|e| e == m))
        {
            return false;
        }

        if !config.generated_suffix.is_empty() && class.name.ends_with(&config.generated_suffix) {
            return false;
        }

        if filters.exclude_stale && is_stale(class, config) {
            return false;
        }

        if let Some(wanted) = &filters.module {
            if module != Some(wanted.as_str()) {
                return false;
            }
        }

        if let Some(ancestor) = &filters.ancestry {
            if !self
                .registry
                .ancestors(class)
                .any(|a| names_equivalent(&a.name, ancestor, &config.type_prefixes))
            {
                return false;
            }
        }

        true
    }
}

impl<'a, R: ClassRegistry + ?Sized> Iterator for NativeScan<'a, R> {
    type Item = ClassMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let class = self.classes.next()?;
            if !self.accepts(class) {
                continue;
            }
            return Some(ClassMatch {
                name: class.name.clone(),
                path: class.path.to_string(),
                parent: self
                    .registry
                    .parent_of(class)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                module: module_of(&class.path, &self.config.module_delimiter)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }
}

/// Iterator returned by [`ClassRegistryScanner::scan_composite`].
pub struct CompositeScan<'a, R: ?Sized> {
    entries: Box<dyn Iterator<Item = AssetEntry> + 'a>,
    registry: &'a R,
    config: &'a ScanConfig,
    filters: &'a ScanFilters,
}

impl<'a, R: ClassRegistry + ?Sized> CompositeScan<'a, R> {
    /// Ancestry and taxonomy only apply when the parent class is known.
    fn accepts(&self, entry: &AssetEntry, parent: Option<&ClassDescriptor>) -> bool {
        let Some(parent) = parent else {
            return true;
        };

        if let Some(ancestor) = &self.filters.ancestry {
            let prefixes = &self.config.type_prefixes;
            if !std::iter::once(parent)
                .chain(self.registry.ancestors(parent))
                .any(|a| names_equivalent(&a.name, ancestor, prefixes))
            {
                return false;
            }
        }

        if let Some(taxonomy) = self.filters.taxonomy {
            if !taxonomy.matches(
                self.registry,
                parent,
                &entry.name,
                &self.config.interface_prefix,
            ) {
                return false;
            }
        }

        true
    }
}

impl<'a, R: ClassRegistry + ?Sized> Iterator for CompositeScan<'a, R> {
    type Item = CompositeMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.entries.next()?;
            let parent = entry
                .parent_class
                .as_deref()
                .and_then(|p| self.registry.find_by_path(p));
            if !self.accepts(&entry, parent) {
                continue;
            }

            let parent_name = match (parent, entry.parent_class.as_deref()) {
                (Some(class), _) => class.name.clone(),
                (None, Some(path)) => ObjectPath::parse(path)
                    .map(|p| p.object_name().to_string())
                    .unwrap_or_else(|_| path.to_string()),
                (None, None) => String::new(),
            };
            let module = module_of(&entry.path, &self.config.module_delimiter)
                .unwrap_or_default()
                .to_string();
            return Some(CompositeMatch {
                name: entry.name,
                path: entry.path.to_string(),
                parent: parent_name,
                module,
            });
        }
    }
}

fn module_of<'p>(path: &'p ObjectPath, delimiter: &str) -> Option<&'p str> {
    naming::module_segment(path.as_str(), delimiter)
}

fn is_stale(class: &ClassDescriptor, config: &ScanConfig) -> bool {
    class.transient
        || (!config.stale_prefix.is_empty() && class.name.starts_with(&config.stale_prefix))
        || (!config.transient_namespace.is_empty()
            && class.path.contains(&config.transient_namespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRegistry;
    use std::collections::BTreeSet;

    fn registry() -> TestRegistry {
        let mut registry = TestRegistry::new();
        registry.class("/Script/CoreUObject.Object", None);
        registry.class(taxonomy::ACTOR, Some("/Script/CoreUObject.Object"));
        registry.class(taxonomy::PAWN, Some(taxonomy::ACTOR));
        registry.class("/Script/Game.BaseCharacter", Some(taxonomy::PAWN));
        registry.class("/Script/Game.Hero", Some("/Script/Game.BaseCharacter"));
        registry.class("/Script/Game.PPawn", Some(taxonomy::ACTOR));
        registry.class("/Script/Game.Scout", Some("/Script/Game.PPawn"));
        registry.class("/Script/GameCore.Npc", Some(taxonomy::ACTOR));
        registry.class("/Script/Game.Texture", Some("/Script/CoreUObject.Object"));
        registry.class("/Game/Sword.Sword_C", Some(taxonomy::ACTOR));
        registry.class("/Script/Game.REINST_Hero", Some(taxonomy::ACTOR));
        registry.class("/Engine/Transient.Ghost", Some(taxonomy::ACTOR));
        registry
    }

    fn names<I: Iterator<Item = ClassMatch>>(matches: I) -> BTreeSet<String> {
        matches.map(|m| m.name).collect()
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"stalePrefix": "OLD_", "engineModules": []}"#).unwrap();
        assert_eq!(config.stale_prefix, "OLD_");
        assert!(config.engine_modules.is_empty());
        assert_eq!(config.generated_suffix, "_C");
        assert_eq!(config.type_prefixes, vec!['A', 'U', 'F', 'I', 'P']);
    }

    #[test]
    fn default_scan_hides_engine_generated_and_stale() {
        let registry = registry();
        let config = ScanConfig::default();
        let filters = ScanFilters::default();
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let found = names(scanner.scan_native(&filters));
        let expected: BTreeSet<String> = ["BaseCharacter", "Hero", "PPawn", "Scout", "Npc"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn stale_exclusion_is_togglable() {
        let registry = registry();
        let config = ScanConfig::default();
        let filters = ScanFilters::default().exclude_stale(false);
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let found = names(scanner.scan_native(&filters));
        assert!(found.contains("REINST_Hero"));
        assert!(found.contains("Ghost"));
        assert!(!found.contains("Sword_C"));
    }

    #[test]
    fn engine_origin_can_be_included() {
        let registry = registry();
        let config = ScanConfig::default();
        let filters = ScanFilters::default().include_engine_origin(true);
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let found = names(scanner.scan_native(&filters));
        assert!(found.contains("Actor"));
        assert!(found.contains("Pawn"));
        assert!(!found.contains("Texture"));
    }

    #[test]
    fn module_filter_is_exact() {
        let registry = registry();
        let config = ScanConfig::default();
        let filters = ScanFilters::default().module("Game");
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let found = names(scanner.scan_native(&filters));
        assert!(!found.contains("Npc"));
        assert!(found.contains("Hero"));
    }

    #[test]
    fn module_and_ancestry_compose() {
        let registry = registry();
        let config = ScanConfig::default();
        let filters = ScanFilters::default().module("Game").ancestry("BaseCharacter");
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let matches: Vec<ClassMatch> = scanner.scan_native(&filters).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Hero");
        assert_eq!(matches[0].parent, "BaseCharacter");
        assert_eq!(matches[0].module, "Game");
    }

    #[test]
    fn ancestry_tolerates_type_prefix() {
        let registry = registry();
        let config = ScanConfig::default();
        let filters = ScanFilters::default().ancestry("Pawn");
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let found = names(scanner.scan_native(&filters));
        // Descends from Pawn, from PPawn, or from a name equal to Pawn once stripped.
        assert!(found.contains("BaseCharacter"));
        assert!(found.contains("Hero"));
        assert!(found.contains("Scout"));
        assert!(!found.contains("Npc"));
        assert!(!found.contains("PPawn"));

        let prefixed = ScanFilters::default().ancestry("APawn");
        assert_eq!(names(scanner.scan_native(&prefixed)), found);
    }

    #[test]
    fn configured_multibyte_prefix() {
        let mut registry = registry();
        registry.class("/Script/Game.ÄBase", Some(taxonomy::ACTOR));
        registry.class("/Script/Game.Knight", Some("/Script/Game.ÄBase"));
        let config: ScanConfig = serde_json::from_str(r#"{"typePrefixes": ["Ä"]}"#).unwrap();
        let filters = ScanFilters::default().ancestry("Base");
        let scanner = ClassRegistryScanner::new(&registry, &config);
        let found = names(scanner.scan_native(&filters));
        assert!(found.contains("Knight"));
        assert!(!found.contains("ÄBase"));
    }

    #[test]
    fn composite_scan_filters_by_parent_and_taxonomy() {
        let mut registry = registry();
        registry.class(taxonomy::USER_WIDGET, Some("/Script/CoreUObject.Object"));
        registry.asset("BP_Hero", "/Game/Heroes/BP_Hero.BP_Hero", Some("/Script/Game.Hero"));
        registry.asset("WBP_Menu", "/Game/UI/WBP_Menu.WBP_Menu", Some(taxonomy::USER_WIDGET));
        registry.asset(
            "BPI_Usable",
            "/Game/Interfaces/BPI_Usable.BPI_Usable",
            Some("/Script/CoreUObject.Object"),
        );
        registry.asset("BP_Orphan", "/Game/BP_Orphan.BP_Orphan", None);
        registry.asset("BP_Elsewhere", "/Plugin/BP_Elsewhere.BP_Elsewhere", Some(taxonomy::ACTOR));

        let config = ScanConfig::default();
        let scanner = ClassRegistryScanner::new(&registry, &config);

        let all = ScanFilters::default();
        let found: BTreeSet<String> = scanner
            .scan_composite(&registry, &all)
            .map(|m| m.name)
            .collect();
        assert_eq!(found.len(), 4);
        assert!(!found.contains("BP_Elsewhere"));

        let actors = ScanFilters::default().taxonomy(Taxonomy::Actor);
        let found: BTreeSet<String> = scanner
            .scan_composite(&registry, &actors)
            .map(|m| m.name)
            .collect();
        // Unknown parents bypass the taxonomy check.
        assert_eq!(
            found,
            ["BP_Hero", "BP_Orphan"].into_iter().map(String::from).collect()
        );

        let interfaces = ScanFilters::default().taxonomy(Taxonomy::Interface);
        let found: Vec<CompositeMatch> = scanner
            .scan_composite(&registry, &interfaces)
            .filter(|m| m.name != "BP_Orphan")
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "BPI_Usable");
        assert_eq!(found[0].parent, "Object");

        let pawns = ScanFilters::default().ancestry("Pawn").path("/Game/Heroes");
        let found: Vec<CompositeMatch> = scanner.scan_composite(&registry, &pawns).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].parent, "Hero");
    }
}
