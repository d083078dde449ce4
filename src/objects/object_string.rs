use super::object::{Object, ObjectType};

/// Immutable string contents plus the precomputed FNV-1a hash used by the
/// hash table and the intern pool. At most one live instance exists per
/// content; the interner enforces that.
#[repr(C)]
pub struct ObjectString {
    pub object: Object,
    pub content: String,
    pub hash: u32,
}

impl ObjectString {
    pub fn new(content: String, hash: u32) -> ObjectString {
        ObjectString {
            object: Object::new(ObjectType::ObjString),
            content,
            hash,
        }
    }
}

/// 32-bit FNV-1a over the raw bytes.
pub fn hash_string(content: &str) -> u32 {
    let mut hash: u32 = 2166136261;
    for byte in content.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

#[cfg(feature = "debug_trace_object")]
mod debug_feature {
    use super::ObjectString;

    impl Drop for ObjectString {
        fn drop(&mut self) {
            println!("drop string object: content={}", self.content);
        }
    }
}
