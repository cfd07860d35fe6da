use std::fmt;

///
/// ValueKind
///
/// Scalar kind an encoded value was produced from.
/// Byte comparison between two encodings is only meaningful when their
/// kinds are equal and orderable.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Isize,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Usize,
    Float32,
    Float64,
    Text,
    Opaque,
}

impl ValueKind {
    /// Whether byte order of encodings matches value order.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        !matches!(self, Self::Opaque)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Isize => "isize",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Usize => "usize",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Text => "text",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
