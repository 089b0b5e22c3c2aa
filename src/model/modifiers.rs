//! Class-file access flags.

use bitflags::bitflags;

bitflags! {
    /// Access and property flags of a type or member, using class-file values.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

impl Modifiers {
    pub fn is_public(self) -> bool {
        self.contains(Modifiers::PUBLIC)
    }

    pub fn is_protected(self) -> bool {
        self.contains(Modifiers::PROTECTED)
    }

    pub fn is_private(self) -> bool {
        self.contains(Modifiers::PRIVATE)
    }

    /// Public or protected.
    pub fn is_visible(self) -> bool {
        self.intersects(Modifiers::PUBLIC | Modifiers::PROTECTED)
    }

    /// None of public, protected or private.
    pub fn is_package_default(self) -> bool {
        !self.intersects(Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE)
    }

    pub fn is_final(self) -> bool {
        self.contains(Modifiers::FINAL)
    }

    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    pub fn is_synthetic(self) -> bool {
        self.contains(Modifiers::SYNTHETIC)
    }

    pub fn is_interface(self) -> bool {
        self.contains(Modifiers::INTERFACE)
    }

    pub fn is_annotation(self) -> bool {
        self.contains(Modifiers::ANNOTATION)
    }
}
