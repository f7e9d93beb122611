//! Declaration modifier flags.

use bitflags::bitflags;

bitflags! {
    /// Modifiers present on a declaration's modifier list.
    ///
    /// Computed from the keyword children of a `ModifierList`; annotations
    /// are not modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const ABSTRACT = 1 << 4;
        const FINAL = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const STRICTFP = 1 << 8;
        const TRANSIENT = 1 << 9;
        const VOLATILE = 1 << 10;
        const DEFAULT = 1 << 11;

        /// Any explicit access modifier.
        const ACCESS = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

impl Modifiers {
    /// Map a modifier keyword to its flag.
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        let flag = match keyword {
            "public" => Modifiers::PUBLIC,
            "protected" => Modifiers::PROTECTED,
            "private" => Modifiers::PRIVATE,
            "static" => Modifiers::STATIC,
            "abstract" => Modifiers::ABSTRACT,
            "final" => Modifiers::FINAL,
            "native" => Modifiers::NATIVE,
            "synchronized" => Modifiers::SYNCHRONIZED,
            "strictfp" => Modifiers::STRICTFP,
            "transient" => Modifiers::TRANSIENT,
            "volatile" => Modifiers::VOLATILE,
            "default" => Modifiers::DEFAULT,
            _ => return None,
        };
        Some(flag)
    }
}
