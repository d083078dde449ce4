use super::object::{Object, ObjectType};
use super::object_bound_method::ObjectBoundMethod;
use super::object_class::ObjectClass;
use super::object_closure::ObjectClosure;
use super::object_function::ObjectFunction;
use super::object_instance::ObjectInstance;
use super::object_native_function::{NativeFn, ObjectNativeFunction};
use super::object_string::ObjectString;
use super::object_upvalue::ObjectUpvalue;
use crate::logger;
use crate::memory::{MemoryAllocator, VmConfig};
use crate::value::Value;

/// Owner of every heap object. Objects are threaded on an intrusive
/// singly linked list through their headers; everything else in the VM
/// holds non-owning pointers. Only the collector's sweep (or shutdown)
/// frees an object.
pub struct ObjectManager {
    objects: *mut Object,
    pub allocator: MemoryAllocator,
}

impl ObjectManager {
    pub fn new(config: &VmConfig) -> ObjectManager {
        ObjectManager {
            objects: std::ptr::null_mut(),
            allocator: MemoryAllocator::new(config),
        }
    }

    pub fn head(&self) -> *mut Object {
        self.objects
    }

    pub fn set_head(&mut self, object: *mut Object) {
        self.objects = object;
    }

    pub fn iter(&self) -> ObjectListIter {
        ObjectListIter {
            current: self.objects,
        }
    }

    pub fn object_count(&self) -> usize {
        self.iter().count()
    }

    fn register(&mut self, object: *mut Object) {
        let size = unsafe { (*object).deep_size() };
        unsafe {
            (*object).next = self.objects;
        }
        self.objects = object;
        self.allocator.record_allocation(size);

        if self.allocator.log_gc {
            logger::debug(&format!("{:p} allocate {} for {:?}", object, size, unsafe {
                (*object).obj_type
            }));
        }
    }

    pub fn alloc_string(&mut self, content: String, hash: u32) -> *mut ObjectString {
        let ptr = Box::into_raw(Box::new(ObjectString::new(content, hash)));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_function(&mut self) -> *mut ObjectFunction {
        let ptr = Box::into_raw(Box::new(ObjectFunction::new()));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_native_function(&mut self, function: NativeFn) -> *mut ObjectNativeFunction {
        let ptr = Box::into_raw(Box::new(ObjectNativeFunction::new(function)));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_closure(&mut self, function: *mut ObjectFunction) -> *mut ObjectClosure {
        let ptr = Box::into_raw(Box::new(ObjectClosure::new(function)));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_upvalue(&mut self, location: *mut Value) -> *mut ObjectUpvalue {
        let ptr = Box::into_raw(Box::new(ObjectUpvalue::new(location)));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_class(&mut self, name: *mut ObjectString) -> *mut ObjectClass {
        let ptr = Box::into_raw(Box::new(ObjectClass::new(name)));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_instance(&mut self, class: *mut ObjectClass) -> *mut ObjectInstance {
        let ptr = Box::into_raw(Box::new(ObjectInstance::new(class)));
        self.register(ptr as *mut Object);
        ptr
    }

    pub fn alloc_bound_method(
        &mut self,
        receiver: Value,
        method: *mut ObjectClosure,
    ) -> *mut ObjectBoundMethod {
        let ptr = Box::into_raw(Box::new(ObjectBoundMethod::new(receiver, method)));
        self.register(ptr as *mut Object);
        ptr
    }

    /// Frees one object and returns the bytes it accounted for. The caller
    /// is responsible for having unlinked it from the list.
    ///
    /// Safety: `object` must have been allocated by this manager and must
    /// not be reachable from anything that will be used afterwards.
    pub unsafe fn free_object(&mut self, object: *mut Object) -> usize {
        let size = (*object).deep_size();
        self.allocator.record_free(size);

        if self.allocator.log_gc {
            logger::debug(&format!(
                "{:p} free type {:?}",
                object,
                (*object).obj_type
            ));
        }

        // Each variant frees only what it owns: closures keep their
        // upvalue array but not the upvalues, functions keep their chunk
        // but not their name string.
        match (*object).obj_type {
            ObjectType::ObjString => drop(Box::from_raw(object as *mut ObjectString)),
            ObjectType::ObjFunction => drop(Box::from_raw(object as *mut ObjectFunction)),
            ObjectType::ObjNativeFunction => {
                drop(Box::from_raw(object as *mut ObjectNativeFunction))
            }
            ObjectType::ObjClosure => drop(Box::from_raw(object as *mut ObjectClosure)),
            ObjectType::ObjUpvalue => drop(Box::from_raw(object as *mut ObjectUpvalue)),
            ObjectType::ObjClass => drop(Box::from_raw(object as *mut ObjectClass)),
            ObjectType::ObjInstance => drop(Box::from_raw(object as *mut ObjectInstance)),
            ObjectType::ObjBoundMethod => drop(Box::from_raw(object as *mut ObjectBoundMethod)),
        }

        size
    }

    /// Frees everything still on the list, for VM shutdown.
    pub fn free_all(&mut self) {
        let mut object = self.objects;
        while !object.is_null() {
            let next = unsafe { (*object).next };
            unsafe {
                self.free_object(object);
            }
            object = next;
        }
        self.objects = std::ptr::null_mut();
    }
}

impl Drop for ObjectManager {
    fn drop(&mut self) {
        self.free_all();
    }
}

pub struct ObjectListIter {
    current: *mut Object,
}

impl Iterator for ObjectListIter {
    type Item = *mut Object;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_null() {
            return None;
        }
        let object = self.current;
        self.current = unsafe { (*object).next };
        Some(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::object_string::hash_string;

    #[test]
    fn every_allocation_joins_the_object_list() {
        let mut manager = ObjectManager::new(&VmConfig::default());
        assert_eq!(manager.object_count(), 0);

        let a = manager.alloc_string("a".to_string(), hash_string("a"));
        let f = manager.alloc_function();
        let c = manager.alloc_closure(f);
        assert_eq!(manager.object_count(), 3);

        // Newest first.
        let listed: Vec<_> = manager.iter().collect();
        assert_eq!(listed[0], c as *mut Object);
        assert_eq!(listed[1], f as *mut Object);
        assert_eq!(listed[2], a as *mut Object);
    }

    #[test]
    fn allocations_are_accounted_in_bytes() {
        let mut manager = ObjectManager::new(&VmConfig::default());
        manager.alloc_string("tracked".to_string(), hash_string("tracked"));
        assert!(manager.allocator.bytes_allocated > 0);
    }

    #[test]
    fn free_all_empties_the_list_and_the_accounting() {
        let mut manager = ObjectManager::new(&VmConfig::default());
        for i in 0..10 {
            let content = format!("s{}", i);
            let hash = hash_string(&content);
            manager.alloc_string(content, hash);
        }
        manager.free_all();
        assert_eq!(manager.object_count(), 0);
        assert_eq!(manager.allocator.bytes_allocated, 0);
    }

    #[test]
    fn closures_size_their_upvalue_array() {
        let mut manager = ObjectManager::new(&VmConfig::default());
        let f = manager.alloc_function();
        unsafe {
            (*f).upvalue_count = 4;
        }
        let c = manager.alloc_closure(f);
        unsafe {
            assert_eq!((*c).upvalue_count(), 4);
            assert!((*c).upvalues.iter().all(|u| u.is_null()));
        }
    }
}
