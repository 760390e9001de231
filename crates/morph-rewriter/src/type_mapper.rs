//! Objective-C type to Swift type mapping.

use morph_ast::SwiftType;
use morph_parser::ast::{Nullability, ObjcType, TypeNameNode};

/// Swift spelling of a C scalar type name, `None` if `name` is not one.
pub fn scalar_swift_name(name: &str) -> Option<&'static str> {
    let swift = match name {
        "char" => "CChar",
        "signed char" => "CSignedChar",
        "unsigned char" => "CUnsignedChar",
        "short" | "short int" | "signed short" => "CShort",
        "unsigned short" | "unsigned short int" => "CUnsignedShort",
        "int" | "signed" | "signed int" => "CInt",
        "unsigned" | "unsigned int" => "CUnsignedInt",
        "long" | "long int" | "signed long" => "CLong",
        "unsigned long" | "unsigned long int" => "CUnsignedLong",
        "long long" | "signed long long" => "CLongLong",
        "unsigned long long" => "CUnsignedLongLong",
        "float" => "CFloat",
        "double" => "CDouble",
        "bool" | "_Bool" | "BOOL" => "Bool",
        "NSInteger" => "Int",
        "NSUInteger" => "UInt",
        "CGFloat" => "CGFloat",
        "int8_t" => "Int8",
        "int16_t" => "Int16",
        "int32_t" => "Int32",
        "int64_t" => "Int64",
        "uint8_t" => "UInt8",
        "uint16_t" => "UInt16",
        "uint32_t" => "UInt32",
        "uint64_t" => "UInt64",
        _ => return None,
    };
    Some(swift)
}

/// A non-pointer C scalar.
pub fn is_scalar(ty: &ObjcType) -> bool {
    matches!(ty, ObjcType::Struct(name) if scalar_swift_name(name).is_some())
}

/// Maps declared Objective-C types to Swift types.
///
/// Pointers to objects become optionals according to their nullability:
/// `nonnull` is plain, `nullable` is `T?`, no annotation is `T!`.
#[derive(Clone, Debug, Default)]
pub struct TypeMapper {
    /// Type `instancetype` stands for.
    instance_type: Option<String>,
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance_type(name: impl Into<String>) -> Self {
        Self {
            instance_type: Some(name.into()),
        }
    }

    pub fn swift_type_of(&self, node: &TypeNameNode) -> SwiftType {
        self.swift_type(&node.ty, node.nullability)
    }

    pub fn swift_type(&self, ty: &ObjcType, nullability: Option<Nullability>) -> SwiftType {
        let inner = self.unwrapped(ty);
        let is_object = match ty {
            ObjcType::Id { .. } => true,
            ObjcType::Pointer(_) => true,
            ObjcType::Struct(name) => name == "instancetype",
            ObjcType::Generic { .. } => false,
        };
        if !is_object {
            return inner;
        }
        match nullability {
            Some(Nullability::Nonnull) => inner,
            Some(Nullability::Nullable) => SwiftType::optional(inner),
            Some(Nullability::NullUnspecified) | None => SwiftType::implicitly_unwrapped(inner),
        }
    }

    /// The Swift type ignoring nullability.
    pub fn unwrapped(&self, ty: &ObjcType) -> SwiftType {
        match ty {
            ObjcType::Struct(name) => self.named(name),
            ObjcType::Id { protocols } => match protocols.len() {
                0 => SwiftType::any_object(),
                1 => SwiftType::type_name(protocols[0].as_str()),
                _ => SwiftType::ProtocolComposition(
                    protocols.iter().map(|p| SwiftType::type_name(p.as_str())).collect(),
                ),
            },
            ObjcType::Generic { name, parameters } => self.generic(name, parameters),
            ObjcType::Pointer(inner) => match inner.as_ref() {
                // `char *` is a C string, not an object.
                ObjcType::Struct(name) if scalar_swift_name(name).is_some() => SwiftType::generic(
                    "UnsafeMutablePointer",
                    vec![self.named(name)],
                ),
                ObjcType::Struct(name) if name == "void" => SwiftType::type_name("UnsafeMutableRawPointer"),
                other => self.unwrapped(other),
            },
        }
    }

    fn named(&self, name: &str) -> SwiftType {
        if let Some(scalar) = scalar_swift_name(name) {
            return SwiftType::type_name(scalar);
        }
        match name {
            "void" => SwiftType::void(),
            "instancetype" => match &self.instance_type {
                Some(instance) => SwiftType::type_name(instance.as_str()),
                None => SwiftType::any_object(),
            },
            "NSString" | "NSMutableString" => SwiftType::string(),
            "NSArray" | "NSMutableArray" => SwiftType::type_name(name),
            "NSDictionary" | "NSMutableDictionary" => SwiftType::type_name(name),
            "NSObject" => SwiftType::type_name("NSObject"),
            "SEL" => SwiftType::type_name("Selector"),
            _ => SwiftType::type_name(name),
        }
    }

    fn generic(&self, name: &str, parameters: &[ObjcType]) -> SwiftType {
        let params: Vec<SwiftType> = parameters.iter().map(|p| self.unwrapped(p)).collect();
        match (name, params.as_slice()) {
            ("NSArray", [element]) => SwiftType::array(element.clone()),
            ("NSDictionary", [key, value]) => SwiftType::dictionary(key.clone(), value.clone()),
            _ => SwiftType::generic(name, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(name: &str) -> ObjcType {
        ObjcType::Pointer(Box::new(ObjcType::Struct(name.into())))
    }

    #[test]
    fn scalars_map_to_c_interop_names() {
        let mapper = TypeMapper::new();
        for (objc, swift) in [
            ("int", "CInt"),
            ("unsigned int", "CUnsignedInt"),
            ("unsigned", "CUnsignedInt"),
            ("long long", "CLongLong"),
            ("BOOL", "Bool"),
            ("NSInteger", "Int"),
            ("uint8_t", "UInt8"),
        ] {
            assert_eq!(
                mapper.swift_type(&ObjcType::Struct(objc.into()), None).to_string(),
                swift,
                "{objc}"
            );
        }
        assert!(!is_scalar(&ObjcType::Struct("NSString".into())));
        assert!(!is_scalar(&pointer("int")));
    }

    #[test]
    fn object_pointers_follow_nullability() {
        let mapper = TypeMapper::new();
        let ty = pointer("NSString");
        assert_eq!(mapper.swift_type(&ty, Some(Nullability::Nonnull)).to_string(), "String");
        assert_eq!(mapper.swift_type(&ty, Some(Nullability::Nullable)).to_string(), "String?");
        assert_eq!(mapper.swift_type(&ty, None).to_string(), "String!");
        assert_eq!(
            mapper.swift_type(&ObjcType::Id { protocols: Vec::new() }, Some(Nullability::Nonnull)).to_string(),
            "AnyObject"
        );
    }

    #[test]
    fn generic_collections_become_swift_collections() {
        let mapper = TypeMapper::new();
        let array = ObjcType::Pointer(Box::new(ObjcType::Generic {
            name: "NSArray".into(),
            parameters: vec![pointer("NSString")],
        }));
        assert_eq!(mapper.swift_type(&array, Some(Nullability::Nonnull)).to_string(), "[String]");
        let dict = ObjcType::Pointer(Box::new(ObjcType::Generic {
            name: "NSDictionary".into(),
            parameters: vec![pointer("NSString"), pointer("NSNumber")],
        }));
        assert_eq!(
            mapper.swift_type(&dict, Some(Nullability::Nullable)).to_string(),
            "[String: NSNumber]?"
        );
    }

    #[test]
    fn instancetype_is_the_declaring_class() {
        let mapper = TypeMapper::with_instance_type("MyView");
        assert_eq!(
            mapper.swift_type(&ObjcType::Struct("instancetype".into()), Some(Nullability::Nonnull)).to_string(),
            "MyView"
        );
    }
}
