//! Mapping tree: a multi-namespace store of class, field and method names.
//!
//! A [`MappingTree`] holds one source namespace (the obfuscated names) and any
//! number of destination namespaces, each produced by an independent mapping
//! source. Every element carries at most one name per destination namespace.
//!
//! # Storage Model
//!
//! Classes live in an arena addressed by [`ClassId`]. Removing a class empties
//! its slot instead of shifting the arena, so ids handed out earlier stay
//! valid (they simply stop resolving). Fields and methods are owned by their
//! class and addressed by a [`MemberKey`] (source name + source descriptor).
//! [`ElementRef`] combines both into a stable handle usable after removals.
//!
//! # Metadata Namespaces
//!
//! Some destination namespaces do not hold names but per-element metadata
//! extracted from the class files:
//!
//! | Namespace | Element | Value |
//! |-----------|---------|-------|
//! | `modifiers` | all | decimal JVM access flags |
//! | `super` | class | superclass binary name |
//! | `interfaces` | class | comma-separated interface binary names |
//!
//! Any other destination namespace is treated as a naming scheme.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod tiny;

// ============================================================================
// Namespace Constants
// ============================================================================

/// Namespace holding decimal access flags of every element.
pub const NS_MODIFIERS: &str = "modifiers";
/// Namespace holding the superclass binary name of a class.
pub const NS_SUPER: &str = "super";
/// Namespace holding the comma-separated interface binary names of a class.
pub const NS_INTERFACES: &str = "interfaces";

/// Namespaces that carry metadata rather than names.
pub const METADATA_NAMESPACES: &[&str] = &[NS_MODIFIERS, NS_SUPER, NS_INTERFACES];

/// Implicit superclass of a class without a `super` value.
pub const OBJECT_CLASS: &str = "java/lang/Object";

/// Returns `true` if the namespace carries metadata rather than names.
pub fn is_metadata_namespace(name: &str) -> bool {
    METADATA_NAMESPACES.contains(&name)
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by structural tree operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A namespace name appears twice.
    #[error("duplicate namespace '{name}'")]
    DuplicateNamespace { name: String },

    /// The class id does not resolve (never allocated or removed).
    #[error("class {id} not found")]
    ClassNotFound { id: ClassId },
}

// ============================================================================
// Identifiers
// ============================================================================

/// Namespace identifier.
///
/// Destination namespaces are numbered densely from zero in declaration order.
/// Two reserved values exist: [`NamespaceId::SOURCE`] for the source namespace
/// and [`NamespaceId::NULL`] meaning "no namespace".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NamespaceId(pub i32);

impl NamespaceId {
    /// The source (obfuscated) namespace.
    pub const SOURCE: NamespaceId = NamespaceId(-1);
    /// No namespace. Lookups of unknown namespace names resolve to this.
    pub const NULL: NamespaceId = NamespaceId(-2);

    /// Create a destination namespace id.
    pub fn new(id: i32) -> Self {
        NamespaceId(id)
    }

    /// Check if this is the "no namespace" sentinel.
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Check if this is the source namespace.
    pub fn is_source(self) -> bool {
        self == Self::SOURCE
    }

    /// Index into destination name storage, if this is a destination namespace.
    fn dst_index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SOURCE => write!(f, "ns_src"),
            Self::NULL => write!(f, "ns_null"),
            NamespaceId(id) => write!(f, "ns_{}", id),
        }
    }
}

/// Class identifier: an index into the tree's class arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Create a new class ID.
    pub fn new(id: u32) -> Self {
        ClassId(id)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class_{}", self.0)
    }
}

/// Identity of a field or method within its owning class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct MemberKey {
    /// Source name.
    pub name: String,
    /// Source descriptor.
    pub desc: String,
}

impl MemberKey {
    /// Create a new member key.
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        MemberKey {
            name: name.into(),
            desc: desc.into(),
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.desc)
    }
}

/// Stable handle to a class, field or method of a tree.
///
/// Handles do not borrow the tree. A handle whose element was removed simply
/// stops resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum ElementRef {
    Class { id: ClassId },
    Field { owner: ClassId, key: MemberKey },
    Method { owner: ClassId, key: MemberKey },
}

impl ElementRef {
    /// Handle to a class.
    pub fn class(id: ClassId) -> Self {
        ElementRef::Class { id }
    }

    /// Handle to a field of `owner`.
    pub fn field(owner: ClassId, key: MemberKey) -> Self {
        ElementRef::Field { owner, key }
    }

    /// Handle to a method of `owner`.
    pub fn method(owner: ClassId, key: MemberKey) -> Self {
        ElementRef::Method { owner, key }
    }

    /// The class owning this element (the class itself for class handles).
    pub fn owner(&self) -> ClassId {
        match self {
            ElementRef::Class { id } => *id,
            ElementRef::Field { owner, .. } | ElementRef::Method { owner, .. } => *owner,
        }
    }
}

// ============================================================================
// Elements
// ============================================================================

/// Common view over classes, fields and methods.
pub trait ElementMapping {
    /// The name in the source namespace.
    fn src_name(&self) -> &str;

    /// Names per destination namespace, indexed by namespace id.
    fn dst_names(&self) -> &[Option<String>];

    /// Mutable access to the destination names.
    fn dst_names_mut(&mut self) -> &mut Vec<Option<String>>;

    /// The name in the given namespace.
    ///
    /// [`NamespaceId::SOURCE`] yields the source name, [`NamespaceId::NULL`]
    /// always yields `None`.
    fn dst_name(&self, ns: NamespaceId) -> Option<&str> {
        if ns.is_source() {
            return Some(self.src_name());
        }
        let index = ns.dst_index()?;
        self.dst_names().get(index)?.as_deref()
    }

    /// Set or clear the name in a destination namespace.
    ///
    /// Returns `false` (and changes nothing) for the source or null namespace.
    fn set_dst_name(&mut self, ns: NamespaceId, name: Option<String>) -> bool {
        let Some(index) = ns.dst_index() else {
            return false;
        };
        let names = self.dst_names_mut();
        if names.len() <= index {
            names.resize(index + 1, None);
        }
        names[index] = name;
        true
    }
}

/// A class and the members it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    src_name: String,
    dst_names: Vec<Option<String>>,
    fields: Vec<FieldMapping>,
    methods: Vec<MethodMapping>,
}

impl ClassMapping {
    fn new(src_name: impl Into<String>) -> Self {
        ClassMapping {
            src_name: src_name.into(),
            dst_names: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    /// Methods in insertion order.
    pub fn methods(&self) -> &[MethodMapping] {
        &self.methods
    }

    /// Look up a field by key.
    pub fn field(&self, key: &MemberKey) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.matches(key))
    }

    /// Look up a method by key.
    pub fn method(&self, key: &MemberKey) -> Option<&MethodMapping> {
        self.methods.iter().find(|m| m.matches(key))
    }

    /// Look up a field by key for mutation.
    pub fn field_mut(&mut self, key: &MemberKey) -> Option<&mut FieldMapping> {
        self.fields.iter_mut().find(|f| f.matches(key))
    }

    /// Look up a method by key for mutation.
    pub fn method_mut(&mut self, key: &MemberKey) -> Option<&mut MethodMapping> {
        self.methods.iter_mut().find(|m| m.matches(key))
    }

    /// Get or insert a field.
    pub fn add_field(&mut self, name: &str, desc: &str) -> &mut FieldMapping {
        let key = MemberKey::new(name, desc);
        match self.fields.iter().position(|f| f.matches(&key)) {
            Some(index) => &mut self.fields[index],
            None => {
                self.fields.push(FieldMapping::new(key));
                let last = self.fields.len() - 1;
                &mut self.fields[last]
            }
        }
    }

    /// Get or insert a method.
    pub fn add_method(&mut self, name: &str, desc: &str) -> &mut MethodMapping {
        let key = MemberKey::new(name, desc);
        match self.methods.iter().position(|m| m.matches(&key)) {
            Some(index) => &mut self.methods[index],
            None => {
                self.methods.push(MethodMapping::new(key));
                let last = self.methods.len() - 1;
                &mut self.methods[last]
            }
        }
    }

    /// Remove a field, preserving the order of the remaining ones.
    pub fn remove_field(&mut self, key: &MemberKey) -> Option<FieldMapping> {
        let index = self.fields.iter().position(|f| f.matches(key))?;
        Some(self.fields.remove(index))
    }

    /// Remove a method, preserving the order of the remaining ones.
    pub fn remove_method(&mut self, key: &MemberKey) -> Option<MethodMapping> {
        let index = self.methods.iter().position(|m| m.matches(key))?;
        Some(self.methods.remove(index))
    }
}

impl ElementMapping for ClassMapping {
    fn src_name(&self) -> &str {
        &self.src_name
    }

    fn dst_names(&self) -> &[Option<String>] {
        &self.dst_names
    }

    fn dst_names_mut(&mut self) -> &mut Vec<Option<String>> {
        &mut self.dst_names
    }
}

/// A field of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    key: MemberKey,
    dst_names: Vec<Option<String>>,
}

impl FieldMapping {
    fn new(key: MemberKey) -> Self {
        FieldMapping {
            key,
            dst_names: Vec::new(),
        }
    }

    /// The field's key within its owner.
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    /// Source descriptor.
    pub fn src_desc(&self) -> &str {
        &self.key.desc
    }

    fn matches(&self, key: &MemberKey) -> bool {
        self.key == *key
    }
}

impl ElementMapping for FieldMapping {
    fn src_name(&self) -> &str {
        &self.key.name
    }

    fn dst_names(&self) -> &[Option<String>] {
        &self.dst_names
    }

    fn dst_names_mut(&mut self) -> &mut Vec<Option<String>> {
        &mut self.dst_names
    }
}

/// A method of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMapping {
    key: MemberKey,
    dst_names: Vec<Option<String>>,
}

impl MethodMapping {
    fn new(key: MemberKey) -> Self {
        MethodMapping {
            key,
            dst_names: Vec::new(),
        }
    }

    /// The method's key within its owner.
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    /// Source method descriptor, e.g. `(ILjava/lang/String;)V`.
    pub fn src_desc(&self) -> &str {
        &self.key.desc
    }

    fn matches(&self, key: &MemberKey) -> bool {
        self.key == *key
    }
}

impl ElementMapping for MethodMapping {
    fn src_name(&self) -> &str {
        &self.key.name
    }

    fn dst_names(&self) -> &[Option<String>] {
        &self.dst_names
    }

    fn dst_names_mut(&mut self) -> &mut Vec<Option<String>> {
        &mut self.dst_names
    }
}

// ============================================================================
// Mapping Tree
// ============================================================================

/// Multi-namespace mapping tree.
#[derive(Debug, Clone, Default)]
pub struct MappingTree {
    src_namespace: String,
    dst_namespaces: Vec<String>,
    classes: Vec<Option<ClassMapping>>,
    class_by_name: HashMap<String, ClassId>,
}

impl MappingTree {
    /// Create an empty tree with the given namespaces.
    pub fn new(
        src_namespace: impl Into<String>,
        dst_namespaces: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, TreeError> {
        let mut tree = MappingTree {
            src_namespace: src_namespace.into(),
            ..MappingTree::default()
        };
        for ns in dst_namespaces {
            tree.add_namespace(ns)?;
        }
        Ok(tree)
    }

    // ------------------------------------------------------------------------
    // Namespaces
    // ------------------------------------------------------------------------

    /// Name of the source namespace.
    pub fn src_namespace(&self) -> &str {
        &self.src_namespace
    }

    /// Destination namespace names, in id order.
    pub fn dst_namespaces(&self) -> &[String] {
        &self.dst_namespaces
    }

    /// Destination namespace ids, in order.
    pub fn dst_namespace_ids(&self) -> impl Iterator<Item = NamespaceId> + '_ {
        (0..self.dst_namespaces.len()).map(|i| NamespaceId::new(i as i32))
    }

    /// Append a destination namespace.
    pub fn add_namespace(&mut self, name: impl Into<String>) -> Result<NamespaceId, TreeError> {
        let name = name.into();
        if name == self.src_namespace || self.dst_namespaces.contains(&name) {
            return Err(TreeError::DuplicateNamespace { name });
        }
        self.dst_namespaces.push(name);
        Ok(NamespaceId::new(self.dst_namespaces.len() as i32 - 1))
    }

    /// Resolve a namespace name.
    ///
    /// Returns [`NamespaceId::NULL`] for names not in the tree.
    pub fn namespace_id(&self, name: &str) -> NamespaceId {
        if name == self.src_namespace {
            return NamespaceId::SOURCE;
        }
        self.dst_namespaces
            .iter()
            .position(|ns| ns == name)
            .map_or(NamespaceId::NULL, |i| NamespaceId::new(i as i32))
    }

    /// Resolve a namespace id to its name.
    pub fn namespace_name(&self, id: NamespaceId) -> Option<&str> {
        if id.is_source() {
            return Some(&self.src_namespace);
        }
        self.dst_namespaces.get(id.dst_index()?).map(String::as_str)
    }

    /// Check if the tree carries the namespace.
    pub fn has_namespace(&self, name: &str) -> bool {
        !self.namespace_id(name).is_null()
    }

    // ------------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------------

    /// Get or insert a class by source binary name.
    pub fn add_class(&mut self, src_name: &str) -> ClassId {
        if let Some(&id) = self.class_by_name.get(src_name) {
            return id;
        }
        let id = ClassId::new(self.classes.len() as u32);
        self.classes.push(Some(ClassMapping::new(src_name)));
        self.class_by_name.insert(src_name.to_string(), id);
        id
    }

    /// Resolve a class id.
    pub fn class(&self, id: ClassId) -> Option<&ClassMapping> {
        self.classes.get(id.index())?.as_ref()
    }

    /// Resolve a class id for mutation.
    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassMapping> {
        self.classes.get_mut(id.index())?.as_mut()
    }

    /// Look up a class id by source binary name.
    pub fn class_id(&self, src_name: &str) -> Option<ClassId> {
        self.class_by_name.get(src_name).copied()
    }

    /// Look up a class by source binary name.
    pub fn get_class(&self, src_name: &str) -> Option<&ClassMapping> {
        self.class_id(src_name).and_then(|id| self.class(id))
    }

    /// All live classes with their ids, in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassMapping)> + '_ {
        self.classes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ClassId::new(i as u32), c)))
    }

    /// Number of live classes.
    pub fn class_count(&self) -> usize {
        self.class_by_name.len()
    }

    /// Remove a class and all of its members.
    pub fn remove_class(&mut self, id: ClassId) -> Option<ClassMapping> {
        let class = self.classes.get_mut(id.index())?.take()?;
        self.class_by_name.remove(&class.src_name);
        Some(class)
    }

    // ------------------------------------------------------------------------
    // Element Handles
    // ------------------------------------------------------------------------

    /// Check if a handle still resolves.
    pub fn contains(&self, element: &ElementRef) -> bool {
        self.element(element).is_some()
    }

    /// Resolve a handle to an element view.
    pub fn element(&self, element: &ElementRef) -> Option<&dyn ElementMapping> {
        match element {
            ElementRef::Class { id } => self.class(*id).map(|c| c as &dyn ElementMapping),
            ElementRef::Field { owner, key } => self
                .class(*owner)?
                .field(key)
                .map(|f| f as &dyn ElementMapping),
            ElementRef::Method { owner, key } => self
                .class(*owner)?
                .method(key)
                .map(|m| m as &dyn ElementMapping),
        }
    }

    /// Name of an element in a namespace.
    pub fn element_name(&self, element: &ElementRef, ns: NamespaceId) -> Option<&str> {
        self.element(element)?.dst_name(ns)
    }

    /// Set the name of an element in a destination namespace.
    ///
    /// Returns `false` if the element no longer exists or the namespace is
    /// not a destination namespace.
    pub fn set_element_name(
        &mut self,
        element: &ElementRef,
        ns: NamespaceId,
        name: Option<String>,
    ) -> bool {
        match element {
            ElementRef::Class { id } => self
                .class_mut(*id)
                .is_some_and(|c| c.set_dst_name(ns, name)),
            ElementRef::Field { owner, key } => self
                .class_mut(*owner)
                .and_then(|c| c.field_mut(key))
                .is_some_and(|f| f.set_dst_name(ns, name)),
            ElementRef::Method { owner, key } => self
                .class_mut(*owner)
                .and_then(|c| c.method_mut(key))
                .is_some_and(|m| m.set_dst_name(ns, name)),
        }
    }

    /// Detach an element from the collection owning it.
    ///
    /// Returns `false` if it was already gone.
    pub fn remove_element(&mut self, element: &ElementRef) -> bool {
        match element {
            ElementRef::Class { id } => self.remove_class(*id).is_some(),
            ElementRef::Field { owner, key } => self
                .class_mut(*owner)
                .is_some_and(|c| c.remove_field(key).is_some()),
            ElementRef::Method { owner, key } => self
                .class_mut(*owner)
                .is_some_and(|c| c.remove_method(key).is_some()),
        }
    }

    /// Human-readable path of an element: `a/b/C`, `a/b/C.f:I`, `a/b/C.m()V`.
    pub fn describe(&self, element: &ElementRef) -> Option<String> {
        let owner = self.class(element.owner())?;
        match element {
            ElementRef::Class { .. } => Some(owner.src_name.clone()),
            ElementRef::Field { key, .. } => {
                Some(format!("{}.{}:{}", owner.src_name, key.name, key.desc))
            }
            ElementRef::Method { key, .. } => {
                Some(format!("{}.{}{}", owner.src_name, key.name, key.desc))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Class Metadata
    // ------------------------------------------------------------------------

    /// Superclass binary name, defaulting to `java/lang/Object`.
    pub fn superclass<'a>(&self, class: &'a ClassMapping) -> &'a str {
        class
            .dst_name(self.namespace_id(NS_SUPER))
            .unwrap_or(OBJECT_CLASS)
    }

    /// Interface binary names in declaration order.
    pub fn interfaces<'a>(&self, class: &'a ClassMapping) -> Vec<&'a str> {
        class
            .dst_name(self.namespace_id(NS_INTERFACES))
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> MappingTree {
        MappingTree::new("source", ["mojang", NS_SUPER, NS_INTERFACES]).unwrap()
    }

    mod namespace_tests {
        use super::*;

        #[test]
        fn resolves_ids_and_names() {
            let tree = sample_tree();

            assert_eq!(tree.namespace_id("source"), NamespaceId::SOURCE);
            assert_eq!(tree.namespace_id("mojang"), NamespaceId::new(0));
            assert_eq!(tree.namespace_id(NS_INTERFACES), NamespaceId::new(2));
            assert_eq!(tree.namespace_id("yarn"), NamespaceId::NULL);

            assert_eq!(tree.namespace_name(NamespaceId::new(1)), Some(NS_SUPER));
            assert_eq!(tree.namespace_name(NamespaceId::SOURCE), Some("source"));
            assert_eq!(tree.namespace_name(NamespaceId::NULL), None);
            assert_eq!(tree.namespace_name(NamespaceId::new(7)), None);
        }

        #[test]
        fn rejects_duplicate_namespace() {
            let err = MappingTree::new("source", ["mojang", "mojang"]).unwrap_err();
            assert!(matches!(err, TreeError::DuplicateNamespace { name } if name == "mojang"));

            let err = MappingTree::new("source", ["source"]).unwrap_err();
            assert!(matches!(err, TreeError::DuplicateNamespace { .. }));
        }

        #[test]
        fn dst_namespace_ids_are_dense() {
            let tree = sample_tree();
            let ids: Vec<_> = tree.dst_namespace_ids().collect();
            assert_eq!(
                ids,
                vec![NamespaceId::new(0), NamespaceId::new(1), NamespaceId::new(2)]
            );
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn names_per_namespace() {
            let mut tree = sample_tree();
            let mojang = tree.namespace_id("mojang");
            let id = tree.add_class("a");

            let class = tree.class_mut(id).unwrap();
            assert!(class.set_dst_name(mojang, Some("net/Foo".to_string())));
            assert!(!class.set_dst_name(NamespaceId::NULL, Some("x".to_string())));
            assert!(!class.set_dst_name(NamespaceId::SOURCE, Some("x".to_string())));

            let class = tree.class(id).unwrap();
            assert_eq!(class.dst_name(mojang), Some("net/Foo"));
            assert_eq!(class.dst_name(NamespaceId::SOURCE), Some("a"));
            assert_eq!(class.dst_name(NamespaceId::NULL), None);
            assert_eq!(class.dst_name(NamespaceId::new(2)), None);
        }

        #[test]
        fn add_class_is_idempotent() {
            let mut tree = sample_tree();
            let first = tree.add_class("a");
            let second = tree.add_class("a");
            assert_eq!(first, second);
            assert_eq!(tree.class_count(), 1);
        }

        #[test]
        fn members_keep_insertion_order() {
            let mut tree = sample_tree();
            let id = tree.add_class("a");
            let class = tree.class_mut(id).unwrap();
            class.add_method("b", "()V");
            class.add_method("a", "()V");
            class.add_method("b", "()V");
            class.add_method("b", "(I)V");

            let names: Vec<_> = tree
                .class(id)
                .unwrap()
                .methods()
                .iter()
                .map(|m| m.key().to_string())
                .collect();
            assert_eq!(names, vec!["b()V", "a()V", "b(I)V"]);
        }

        #[test]
        fn remove_detaches_from_owner_only() {
            let mut tree = sample_tree();
            let a = tree.add_class("a");
            let b = tree.add_class("b");
            tree.class_mut(a).unwrap().add_field("f", "I");
            tree.class_mut(b).unwrap().add_field("f", "I");

            let handle = ElementRef::field(a, MemberKey::new("f", "I"));
            assert!(tree.remove_element(&handle));
            assert!(!tree.remove_element(&handle));

            assert!(tree.class(a).unwrap().fields().is_empty());
            assert_eq!(tree.class(b).unwrap().fields().len(), 1);
        }

        #[test]
        fn removed_class_stops_resolving() {
            let mut tree = sample_tree();
            let a = tree.add_class("a");
            tree.class_mut(a).unwrap().add_method("m", "()V");
            let method = ElementRef::method(a, MemberKey::new("m", "()V"));

            assert!(tree.remove_element(&ElementRef::class(a)));
            assert!(tree.get_class("a").is_none());
            assert!(!tree.contains(&method));
            assert!(!tree.set_element_name(&method, NamespaceId::new(0), Some("x".into())));
            assert_eq!(tree.classes().count(), 0);
        }

        #[test]
        fn describe_elements() {
            let mut tree = sample_tree();
            let a = tree.add_class("pkg/A");
            assert_eq!(tree.describe(&ElementRef::class(a)).unwrap(), "pkg/A");
            assert_eq!(
                tree.describe(&ElementRef::field(a, MemberKey::new("f", "I")))
                    .unwrap(),
                "pkg/A.f:I"
            );
            assert_eq!(
                tree.describe(&ElementRef::method(a, MemberKey::new("m", "()V")))
                    .unwrap(),
                "pkg/A.m()V"
            );
        }
    }

    mod metadata_tests {
        use super::*;

        #[test]
        fn superclass_defaults_to_object() {
            let mut tree = sample_tree();
            let id = tree.add_class("a");
            let class = tree.class(id).unwrap();
            assert_eq!(tree.superclass(class), OBJECT_CLASS);
            assert!(tree.interfaces(class).is_empty());
        }

        #[test]
        fn interfaces_split_on_commas() {
            let mut tree = sample_tree();
            let ns = tree.namespace_id(NS_INTERFACES);
            let id = tree.add_class("a");
            tree.class_mut(id)
                .unwrap()
                .set_dst_name(ns, Some("b,,c, d".to_string()));

            let class = tree.class(id).unwrap();
            assert_eq!(tree.interfaces(class), vec!["b", "c", "d"]);
        }
    }
}
