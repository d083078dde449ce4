use crate::call_frame::CallFrame;
use crate::logger;
use crate::objects::object::{Object, ObjectType};
use crate::objects::object_manager::ObjectManager;
use crate::objects::object_string::ObjectString;
use crate::objects::object_upvalue::ObjectUpvalue;
use crate::table::Table;
use crate::value::{as_object, format_value, is_object, make_object_value, Value, ValueArray};

// Collector-internal tracing, compiled out unless the feature is on.
#[cfg(feature = "gc_debug")]
macro_rules! gc_trace {
    ($($arg:tt)*) => { eprintln!("[gc-trace] {}", format_args!($($arg)*)); }
}
#[cfg(not(feature = "gc_debug"))]
macro_rules! gc_trace {
    ($($arg:tt)*) => {};
}

/// Aggregated collection statistics; live byte totals stay on the allocator.
#[derive(Default, Debug, Clone)]
pub struct GCStats {
    pub cycles: u64,
    pub total_freed_bytes: usize,
    pub last_freed_bytes: usize,
    pub last_before_bytes: usize,
    pub last_after_bytes: usize,
    pub last_next_trigger_bytes: usize,
}

impl GCStats {
    fn record(&mut self, before: usize, freed: usize, after: usize, next_trigger: usize) {
        self.cycles += 1;
        self.total_freed_bytes += freed;
        self.last_freed_bytes = freed;
        self.last_before_bytes = before;
        self.last_after_bytes = after;
        self.last_next_trigger_bytes = next_trigger;
    }
}

/// Everything the collector treats as a root, borrowed from the VM for the
/// duration of one cycle. The protected object is read off the allocator.
pub struct RootSet<'a> {
    pub stack: &'a [Value],
    pub frames: &'a [CallFrame],
    pub open_upvalues: *mut ObjectUpvalue,
    pub globals: &'a Table,
    pub init_string: *mut ObjectString,
}

/// Tri-color mark-and-sweep over the manager's intrusive object list.
/// White objects carry a cleared mark bit, gray ones sit on the worklist
/// with the bit set, black ones have been popped and had their children
/// marked. The worklist is a plain `Vec` so marking never feeds back into
/// the tracked heap.
pub struct GarbageCollector {
    gray_stack: Vec<*mut Object>,
    log_gc: bool,
    stats: GCStats,
}

impl GarbageCollector {
    pub fn new() -> GarbageCollector {
        GarbageCollector {
            gray_stack: vec![],
            log_gc: false,
            stats: GCStats::default(),
        }
    }

    pub fn collect(&mut self, roots: RootSet, strings: &mut Table, objects: &mut ObjectManager) {
        self.log_gc = objects.allocator.log_gc;
        let before = objects.allocator.bytes_allocated;
        if self.log_gc {
            logger::debug("-- start gc --");
        }

        self.mark_roots(&roots, objects.allocator.protected_object);
        self.trace_references();

        // Interned strings are weak: entries whose keys are still white
        // must leave the pool before the sweep frees them.
        strings.remove_white();

        let freed = self.sweep(objects);
        objects.allocator.update_threshold();

        let after = objects.allocator.bytes_allocated;
        let next_trigger = objects.allocator.next_gc;
        self.stats.record(before, freed, after, next_trigger);
        gc_trace!(
            "cycle {} freed={} before={} after={} next={}",
            self.stats.cycles,
            freed,
            before,
            after,
            next_trigger
        );

        if self.log_gc {
            logger::debug(&format!(
                "collected {} bytes (from {} to {}) next at {}",
                freed, before, after, next_trigger
            ));
            logger::debug("-- end gc --");
        }
    }

    pub fn stats(&self) -> &GCStats {
        &self.stats
    }

    fn mark_roots(&mut self, roots: &RootSet, protected: *mut Object) {
        for value in roots.stack {
            self.mark_value(value);
        }

        for frame in roots.frames {
            self.mark_object(frame.closure as *mut Object);
        }

        let mut upvalue = roots.open_upvalues;
        while !upvalue.is_null() {
            self.mark_object(upvalue as *mut Object);
            upvalue = unsafe { (*upvalue).next };
        }

        self.mark_table(roots.globals);
        self.mark_object(roots.init_string as *mut Object);
        self.mark_object(protected);
    }

    fn mark_value(&mut self, value: &Value) {
        if is_object(value) {
            self.mark_object(as_object(value));
        }
    }

    fn mark_object(&mut self, object: *mut Object) {
        if object.is_null() || unsafe { (*object).is_marked } {
            return;
        }

        if self.log_gc {
            logger::debug(&format!(
                "{:p} mark {}",
                object,
                format_value(&make_object_value(object))
            ));
        }

        unsafe {
            (*object).is_marked = true;
        }
        self.gray_stack.push(object);
        gc_trace!("gray {:p}", object);
    }

    fn mark_table(&mut self, table: &Table) {
        for (key, value) in table.iter() {
            self.mark_object(key as *mut Object);
            self.mark_value(&value);
        }
    }

    fn mark_array(&mut self, array: &ValueArray) {
        for value in array {
            self.mark_value(value);
        }
    }

    fn trace_references(&mut self) {
        while let Some(object) = self.gray_stack.pop() {
            unsafe {
                self.blacken_object(object);
            }
        }
    }

    /// Marks everything `object` references. Strings and natives are leaves.
    unsafe fn blacken_object(&mut self, object: *mut Object) {
        if self.log_gc {
            logger::debug(&format!(
                "{:p} blacken {}",
                object,
                format_value(&make_object_value(object))
            ));
        }

        match (*object).obj_type {
            ObjectType::ObjString | ObjectType::ObjNativeFunction => {}
            ObjectType::ObjUpvalue => {
                let upvalue = (*object).as_upvalue();
                self.mark_value(&upvalue.closed);
            }
            ObjectType::ObjFunction => {
                let function = (*object).as_function();
                self.mark_object(function.name as *mut Object);
                self.mark_array(&function.chunk.constants);
            }
            ObjectType::ObjClosure => {
                let closure = (*object).as_closure();
                self.mark_object(closure.function as *mut Object);
                for &upvalue in &closure.upvalues {
                    self.mark_object(upvalue as *mut Object);
                }
            }
            ObjectType::ObjClass => {
                let class = (*object).as_class();
                self.mark_object(class.name as *mut Object);
                self.mark_table(&class.methods);
            }
            ObjectType::ObjInstance => {
                let instance = (*object).as_instance();
                self.mark_object(instance.class as *mut Object);
                self.mark_table(&instance.fields);
            }
            ObjectType::ObjBoundMethod => {
                let bound = (*object).as_bound_method();
                self.mark_value(&bound.receiver);
                self.mark_object(bound.method as *mut Object);
            }
        }
    }

    /// Walks the object list, unlinking and freeing whatever stayed white
    /// and clearing the mark on everything else. Returns bytes freed.
    fn sweep(&mut self, objects: &mut ObjectManager) -> usize {
        let mut freed = 0;
        let mut previous: *mut Object = std::ptr::null_mut();
        let mut object = objects.head();

        while !object.is_null() {
            unsafe {
                if (*object).is_marked {
                    (*object).is_marked = false;
                    previous = object;
                    object = (*object).next;
                } else {
                    let unreached = object;
                    object = (*object).next;
                    if previous.is_null() {
                        objects.set_head(object);
                    } else {
                        (*previous).next = object;
                    }
                    freed += objects.free_object(unreached);
                }
            }
        }

        gc_trace!("sweep freed {} bytes", freed);
        freed
    }
}

impl Default for GarbageCollector {
    fn default() -> Self {
        GarbageCollector::new()
    }
}
