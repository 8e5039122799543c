//! JVM access flags as stored in the `modifiers` namespace.

use bitflags::bitflags;

use crate::tree::{ElementMapping, MappingTree, NS_MODIFIERS};

bitflags! {
    /// Access and property flags of a class, field or method.
    ///
    /// Several bits are shared between element kinds (e.g. `VOLATILE` on a
    /// field is `BRIDGE` on a method); the analysis only looks at the bits
    /// that mean the same thing everywhere.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MANDATED = 0x8000;
    }
}

impl AccessFlags {
    /// Parse a decimal `modifiers` value.
    ///
    /// Unknown bits are retained. Returns `None` for anything that is not a
    /// plain (optionally negative) 32-bit decimal integer.
    pub fn parse(value: &str) -> Option<Self> {
        value
            .parse::<i32>()
            .ok()
            .map(|bits| AccessFlags::from_bits_retain(bits as u32))
    }

    /// Read the flags of an element from its tree.
    ///
    /// `None` when the tree has no `modifiers` namespace, the element has no
    /// value there, or the value does not parse.
    pub fn of(tree: &MappingTree, element: &(impl ElementMapping + ?Sized)) -> Option<Self> {
        element
            .dst_name(tree.namespace_id(NS_MODIFIERS))
            .and_then(AccessFlags::parse)
    }

    /// Flags of an element, treating missing data as no flags.
    pub fn of_or_empty(tree: &MappingTree, element: &(impl ElementMapping + ?Sized)) -> Self {
        Self::of(tree, element).unwrap_or_else(AccessFlags::empty)
    }

    pub fn is_private(self) -> bool {
        self.contains(AccessFlags::PRIVATE)
    }

    pub fn is_synthetic(self) -> bool {
        self.contains(AccessFlags::SYNTHETIC)
    }
}
