use std::io::{self, Write};
use std::ptr;

use crate::call_frame::CallFrame;
use crate::chunk::OpCode;
use crate::constants::{FRAMES_MAX, STACK_MAX};
use crate::gc::{GCStats, GarbageCollector, RootSet};
use crate::memory::VmConfig;
use crate::objects::object::{Object, ObjectType};
use crate::objects::object_bound_method::ObjectBoundMethod;
use crate::objects::object_class::ObjectClass;
use crate::objects::object_closure::ObjectClosure;
use crate::objects::object_function::ObjectFunction;
use crate::objects::object_instance::ObjectInstance;
use crate::objects::object_manager::ObjectManager;
use crate::objects::object_native_function::{NativeFn, ObjectNativeFunction};
use crate::objects::object_string::{hash_string, ObjectString};
use crate::objects::object_upvalue::ObjectUpvalue;
use crate::std_mod;
use crate::table::Table;
use crate::value::{
    as_bool, as_number, as_object, format_value, is_bool, is_class, is_instance, is_nil,
    is_number, is_object, is_string, make_bool_value, make_nil_value, make_number_value,
    make_object_value, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    InterpretOk,
    InterpretCompileError,
    InterpretRuntimeError,
    /// The current instruction finished but the program has not; only
    /// surfaced by `interpret_next_instruction`.
    InterpretIncomplete,
}

pub struct VM {
    pub(crate) frames: Vec<CallFrame>,
    pub(crate) stack: Box<[Value]>,
    pub(crate) stack_top: usize,
    pub(crate) globals: Table,
    /// Intern pool; keys are weak from the collector's point of view.
    pub(crate) strings: Table,
    pub(crate) open_upvalues: *mut ObjectUpvalue,
    pub(crate) init_string: *mut ObjectString,
    pub(crate) objects: ObjectManager,
    pub(crate) gc: GarbageCollector,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl VM {
    pub fn new() -> VM {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> VM {
        let mut vm = VM {
            frames: Vec::with_capacity(FRAMES_MAX),
            stack: vec![make_nil_value(); STACK_MAX].into_boxed_slice(),
            stack_top: 0,
            globals: Table::new(),
            strings: Table::new(),
            open_upvalues: ptr::null_mut(),
            init_string: ptr::null_mut(),
            objects: ObjectManager::new(&config),
            gc: GarbageCollector::new(),
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        };

        vm.init_string = vm.copy_string("init");
        std_mod::install(&mut vm);
        vm
    }

    pub fn set_stdout(&mut self, sink: Box<dyn Write>) {
        self.stdout = sink;
    }

    pub fn set_stderr(&mut self, sink: Box<dyn Write>) {
        self.stderr = sink;
    }

    pub fn gc_stats(&self) -> &GCStats {
        self.gc.stats()
    }

    /// Runs a compiled top-level function to completion. The function must
    /// take no arguments; the producer contract guarantees its chunk is
    /// well formed.
    pub fn interpret(&mut self, function: *mut ObjectFunction) -> InterpretResult {
        self.stack_push(make_object_value(function as *mut Object));
        let closure = self.new_closure(function);
        self.stack_pop();
        self.stack_push(make_object_value(closure as *mut Object));
        if !self.call(closure, 0) {
            return InterpretResult::InterpretRuntimeError;
        }
        self.run()
    }

    fn run(&mut self) -> InterpretResult {
        loop {
            let result = self.interpret_next_instruction();
            if result != InterpretResult::InterpretIncomplete {
                return result;
            }
        }
    }

    /// Executes exactly one instruction of the current frame.
    pub fn interpret_next_instruction(&mut self) -> InterpretResult {
        #[cfg(feature = "debug_trace_execution")]
        self.trace_instruction();

        let frame = self.current_frame();
        unsafe {
            let byte = (*frame).read_byte();
            let instruction = match OpCode::from_repr(byte) {
                Some(instruction) => instruction,
                None => {
                    self.runtime_error(&format!("Unknown opcode {}.", byte));
                    return InterpretResult::InterpretRuntimeError;
                }
            };

            match instruction {
                OpCode::Constant => {
                    let constant = (*frame).read_constant();
                    self.stack_push(constant);
                }
                OpCode::Nil => self.stack_push(make_nil_value()),
                OpCode::True => self.stack_push(make_bool_value(true)),
                OpCode::False => self.stack_push(make_bool_value(false)),
                OpCode::Pop => {
                    self.stack_pop();
                }
                OpCode::GetLocal => {
                    let slot = (*frame).read_byte() as usize;
                    let value = self.stack[(*frame).slots + slot];
                    self.stack_push(value);
                }
                OpCode::SetLocal => {
                    let slot = (*frame).read_byte() as usize;
                    self.stack[(*frame).slots + slot] = self.stack_peek(0);
                }
                OpCode::GetGlobal => {
                    let name = (*frame).read_string();
                    match self.globals.find(name) {
                        Some(value) => self.stack_push(value),
                        None => {
                            self.runtime_error(&format!(
                                "Undefined variable '{}'.",
                                (*name).content
                            ));
                            return InterpretResult::InterpretRuntimeError;
                        }
                    }
                }
                OpCode::DefineGlobal => {
                    let name = (*frame).read_string();
                    // The value stays on the stack until the table owns
                    // it, keeping it rooted across the insertion.
                    let value = self.stack_peek(0);
                    self.globals.insert(name, value);
                    self.stack_pop();
                }
                OpCode::SetGlobal => {
                    let name = (*frame).read_string();
                    let value = self.stack_peek(0);
                    if self.globals.insert(name, value) {
                        self.globals.remove(name);
                        self.runtime_error(&format!(
                            "Undefined variable '{}'.",
                            (*name).content
                        ));
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::GetUpvalue => {
                    let slot = (*frame).read_byte() as usize;
                    let upvalue = (&(*(*frame).closure).upvalues)[slot];
                    self.stack_push(*(*upvalue).location);
                }
                OpCode::SetUpvalue => {
                    let slot = (*frame).read_byte() as usize;
                    let upvalue = (&(*(*frame).closure).upvalues)[slot];
                    *(*upvalue).location = self.stack_peek(0);
                }
                OpCode::GetProperty => {
                    let receiver = self.stack_peek(0);
                    if !is_instance(&receiver) {
                        self.runtime_error("Only instances have properties.");
                        return InterpretResult::InterpretRuntimeError;
                    }
                    let instance = as_object(&receiver) as *mut ObjectInstance;
                    let name = (*frame).read_string();

                    if let Some(value) = (*instance).fields.find(name) {
                        self.stack_pop();
                        self.stack_push(value);
                    } else if !self.bind_method((*instance).class, name) {
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::SetProperty => {
                    let receiver = self.stack_peek(1);
                    if !is_instance(&receiver) {
                        self.runtime_error("Only instances have fields.");
                        return InterpretResult::InterpretRuntimeError;
                    }
                    let instance = as_object(&receiver) as *mut ObjectInstance;
                    let name = (*frame).read_string();
                    let value = self.stack_peek(0);
                    (*instance).fields.insert(name, value);

                    // Leave the assigned value as the expression result.
                    let value = self.stack_pop();
                    self.stack_pop();
                    self.stack_push(value);
                }
                OpCode::GetSuper => {
                    let name = (*frame).read_string();
                    let superclass = as_object(&self.stack_pop()) as *mut ObjectClass;
                    if !self.bind_method(superclass, name) {
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::Equal => {
                    let b = self.stack_pop();
                    let a = self.stack_pop();
                    self.stack_push(make_bool_value(a == b));
                }
                OpCode::Greater
                | OpCode::Less
                | OpCode::Subtract
                | OpCode::Multiply
                | OpCode::Divide => {
                    if !self.binary_number_op(instruction) {
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::Add => {
                    let b = self.stack_peek(0);
                    let a = self.stack_peek(1);
                    if is_string(&a) && is_string(&b) {
                        self.concatenate();
                    } else if is_number(&a) && is_number(&b) {
                        let b = as_number(&self.stack_pop());
                        let a = as_number(&self.stack_pop());
                        self.stack_push(make_number_value(a + b));
                    } else {
                        self.runtime_error("Operands must be two numbers or two strings.");
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::Not => {
                    let value = self.stack_pop();
                    self.stack_push(make_bool_value(is_falsey(&value)));
                }
                OpCode::Negate => {
                    if !is_number(&self.stack_peek(0)) {
                        self.runtime_error("Operand must be a number.");
                        return InterpretResult::InterpretRuntimeError;
                    }
                    let value = as_number(&self.stack_pop());
                    self.stack_push(make_number_value(-value));
                }
                OpCode::Print => {
                    let value = self.stack_pop();
                    let _ = writeln!(self.stdout, "{}", format_value(&value));
                }
                OpCode::Jump => {
                    let offset = (*frame).read_short() as usize;
                    (*frame).ip += offset;
                }
                OpCode::JumpIfFalse => {
                    let offset = (*frame).read_short() as usize;
                    if is_falsey(&self.stack_peek(0)) {
                        (*frame).ip += offset;
                    }
                }
                OpCode::Loop => {
                    let offset = (*frame).read_short() as usize;
                    (*frame).ip -= offset;
                }
                OpCode::Call => {
                    let arg_count = (*frame).read_byte() as usize;
                    let callee = self.stack_peek(arg_count);
                    if !self.call_value(callee, arg_count) {
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::Invoke => {
                    let name = (*frame).read_string();
                    let arg_count = (*frame).read_byte() as usize;
                    if !self.invoke(name, arg_count) {
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::SuperInvoke => {
                    let name = (*frame).read_string();
                    let arg_count = (*frame).read_byte() as usize;
                    let superclass = as_object(&self.stack_pop()) as *mut ObjectClass;
                    if !self.invoke_from_class(superclass, name, arg_count) {
                        return InterpretResult::InterpretRuntimeError;
                    }
                }
                OpCode::Closure => {
                    let constant = (*frame).read_constant();
                    let function = as_object(&constant) as *mut ObjectFunction;
                    let closure = self.new_closure(function);
                    self.stack_push(make_object_value(closure as *mut Object));
                    for i in 0..(*closure).upvalue_count() {
                        let is_local = (*frame).read_byte();
                        let index = (*frame).read_byte() as usize;
                        if is_local != 0 {
                            let local = self.stack_slot((*frame).slots + index);
                            (&mut (*closure).upvalues)[i] = self.capture_upvalue(local);
                        } else {
                            (&mut (*closure).upvalues)[i] = (&(*(*frame).closure).upvalues)[index];
                        }
                    }
                }
                OpCode::CloseUpvalue => {
                    let last = self.stack_slot(self.stack_top - 1);
                    self.close_upvalues(last);
                    self.stack_pop();
                }
                OpCode::Return => {
                    let result = self.stack_pop();
                    let base = (*frame).slots;
                    let base_slot = self.stack_slot(base);
                    self.close_upvalues(base_slot);
                    self.frames.pop();
                    if self.frames.is_empty() {
                        self.stack_pop();
                        return InterpretResult::InterpretOk;
                    }
                    self.stack_top = base;
                    self.stack_push(result);
                }
                OpCode::Class => {
                    let name = (*frame).read_string();
                    let class = self.new_class(name);
                    self.stack_push(make_object_value(class as *mut Object));
                }
                OpCode::Inherit => {
                    let superclass = self.stack_peek(1);
                    if !is_class(&superclass) {
                        self.runtime_error("Superclass must be a class.");
                        return InterpretResult::InterpretRuntimeError;
                    }
                    let superclass = as_object(&superclass) as *mut ObjectClass;
                    let subclass = as_object(&self.stack_peek(0)) as *mut ObjectClass;
                    (*subclass).methods.add_all(&(*superclass).methods);
                    // The superclass stays put; it becomes the `super`
                    // local for the method bodies that follow.
                    self.stack_pop();
                }
                OpCode::Method => {
                    let name = (*frame).read_string();
                    self.define_method(name);
                }
            }
        }

        InterpretResult::InterpretIncomplete
    }

    pub fn stack_push(&mut self, value: Value) {
        self.stack[self.stack_top] = value;
        self.stack_top += 1;
    }

    pub fn stack_pop(&mut self) -> Value {
        self.stack_top -= 1;
        self.stack[self.stack_top]
    }

    pub fn stack_peek(&self, distance: usize) -> Value {
        self.stack[self.stack_top - 1 - distance]
    }

    pub(crate) fn stack_slot(&mut self, index: usize) -> *mut Value {
        unsafe { self.stack.as_mut_ptr().add(index) }
    }

    fn current_frame(&mut self) -> *mut CallFrame {
        debug_assert!(!self.frames.is_empty());
        let last = self.frames.len() - 1;
        unsafe { self.frames.as_mut_ptr().add(last) }
    }

    fn reset_stack(&mut self) {
        self.stack_top = 0;
        self.frames.clear();
        self.open_upvalues = ptr::null_mut();
    }

    fn binary_number_op(&mut self, op: OpCode) -> bool {
        if !is_number(&self.stack_peek(0)) || !is_number(&self.stack_peek(1)) {
            self.runtime_error("Operands must be numbers.");
            return false;
        }
        let b = as_number(&self.stack_pop());
        let a = as_number(&self.stack_pop());
        match op {
            OpCode::Greater => self.stack_push(make_bool_value(a > b)),
            OpCode::Less => self.stack_push(make_bool_value(a < b)),
            OpCode::Subtract => self.stack_push(make_number_value(a - b)),
            OpCode::Multiply => self.stack_push(make_number_value(a * b)),
            OpCode::Divide => self.stack_push(make_number_value(a / b)),
            _ => unreachable!("not a binary numeric opcode"),
        }
        true
    }

    /// Both operands stay on the stack until the result is interned, so a
    /// collection triggered by the new allocation cannot free them.
    fn concatenate(&mut self) {
        unsafe {
            let b = as_object(&self.stack_peek(0)) as *mut ObjectString;
            let a = as_object(&self.stack_peek(1)) as *mut ObjectString;

            let mut combined =
                String::with_capacity((&(*a).content).len() + (&(*b).content).len());
            combined.push_str(&(*a).content);
            combined.push_str(&(*b).content);

            let result = self.take_string(combined);
            self.stack_pop();
            self.stack_pop();
            self.stack_push(make_object_value(result as *mut Object));
        }
    }

    fn call(&mut self, closure: *mut ObjectClosure, arg_count: usize) -> bool {
        let arity = unsafe { (*(*closure).function).arity };
        if arg_count != arity {
            self.runtime_error(&format!(
                "Expected {} arguments but got {}.",
                arity, arg_count
            ));
            return false;
        }

        if self.frames.len() == FRAMES_MAX {
            self.runtime_error("Stack overflow.");
            return false;
        }

        let slots = self.stack_top - arg_count - 1;
        self.frames.push(CallFrame::new(closure, slots));
        true
    }

    fn call_value(&mut self, callee: Value, arg_count: usize) -> bool {
        if is_object(&callee) {
            let object = as_object(&callee);
            match unsafe { (*object).obj_type } {
                ObjectType::ObjBoundMethod => {
                    let bound = object as *mut ObjectBoundMethod;
                    let slot = self.stack_top - arg_count - 1;
                    self.stack[slot] = unsafe { (*bound).receiver };
                    return self.call(unsafe { (*bound).method }, arg_count);
                }
                ObjectType::ObjClass => {
                    let class = object as *mut ObjectClass;
                    let instance = self.new_instance(class);
                    let slot = self.stack_top - arg_count - 1;
                    self.stack[slot] = make_object_value(instance as *mut Object);

                    if let Some(initializer) =
                        unsafe { (*class).methods.find(self.init_string) }
                    {
                        let closure = as_object(&initializer) as *mut ObjectClosure;
                        return self.call(closure, arg_count);
                    } else if arg_count != 0 {
                        self.runtime_error(&format!(
                            "Expected 0 arguments but got {}.",
                            arg_count
                        ));
                        return false;
                    }
                    return true;
                }
                ObjectType::ObjClosure => {
                    return self.call(object as *mut ObjectClosure, arg_count)
                }
                ObjectType::ObjNativeFunction => {
                    let native = unsafe { (*(object as *mut ObjectNativeFunction)).function };
                    let args_start = self.stack_top - arg_count;
                    let result = native(arg_count, &self.stack[args_start..self.stack_top]);
                    self.stack_top -= arg_count + 1;
                    self.stack_push(result);
                    return true;
                }
                _ => {}
            }
        }
        self.runtime_error("Can only call functions and classes.");
        false
    }

    /// Fast-path property call: fields shadow methods, and a callable
    /// field replaces the receiver in the callee slot.
    fn invoke(&mut self, name: *mut ObjectString, arg_count: usize) -> bool {
        let receiver = self.stack_peek(arg_count);
        if !is_instance(&receiver) {
            self.runtime_error("Only instances have methods.");
            return false;
        }
        let instance = as_object(&receiver) as *mut ObjectInstance;

        if let Some(field) = unsafe { (*instance).fields.find(name) } {
            let slot = self.stack_top - arg_count - 1;
            self.stack[slot] = field;
            return self.call_value(field, arg_count);
        }

        self.invoke_from_class(unsafe { (*instance).class }, name, arg_count)
    }

    fn invoke_from_class(
        &mut self,
        class: *mut ObjectClass,
        name: *mut ObjectString,
        arg_count: usize,
    ) -> bool {
        let method = match unsafe { (*class).methods.find(name) } {
            Some(method) => method,
            None => {
                self.runtime_error(&format!("Undefined property '{}'.", unsafe {
                    &(*name).content
                }));
                return false;
            }
        };
        self.call(as_object(&method) as *mut ObjectClosure, arg_count)
    }

    fn bind_method(&mut self, class: *mut ObjectClass, name: *mut ObjectString) -> bool {
        let method = match unsafe { (*class).methods.find(name) } {
            Some(method) => method,
            None => {
                self.runtime_error(&format!("Undefined property '{}'.", unsafe {
                    &(*name).content
                }));
                return false;
            }
        };

        let receiver = self.stack_peek(0);
        let bound = self.new_bound_method(receiver, as_object(&method) as *mut ObjectClosure);
        self.stack_pop();
        self.stack_push(make_object_value(bound as *mut Object));
        true
    }

    fn define_method(&mut self, name: *mut ObjectString) {
        let method = self.stack_peek(0);
        let class = as_object(&self.stack_peek(1)) as *mut ObjectClass;
        unsafe {
            (*class).methods.insert(name, method);
        }
        self.stack_pop();
    }

    /// Finds or creates the open upvalue for a stack slot. The list is
    /// kept sorted by descending slot address and never holds two entries
    /// for the same slot.
    pub(crate) fn capture_upvalue(&mut self, local: *mut Value) -> *mut ObjectUpvalue {
        let mut previous: *mut ObjectUpvalue = ptr::null_mut();
        let mut upvalue = self.open_upvalues;
        unsafe {
            while !upvalue.is_null() && (*upvalue).location > local {
                previous = upvalue;
                upvalue = (*upvalue).next;
            }
            if !upvalue.is_null() && ptr::eq((*upvalue).location, local) {
                return upvalue;
            }
        }

        let created = self.new_upvalue(local);
        unsafe {
            (*created).next = upvalue;
            if previous.is_null() {
                self.open_upvalues = created;
            } else {
                (*previous).next = created;
            }
        }
        created
    }

    /// Closes every open upvalue at or above `last`, migrating the
    /// captured storage off the stack and into the upvalue itself.
    pub(crate) fn close_upvalues(&mut self, last: *mut Value) {
        unsafe {
            while !self.open_upvalues.is_null() && (*self.open_upvalues).location >= last {
                let upvalue = self.open_upvalues;
                (*upvalue).closed = *(*upvalue).location;
                (*upvalue).location = &mut (*upvalue).closed;
                self.open_upvalues = (*upvalue).next;
            }
        }
    }

    fn runtime_error(&mut self, message: &str) {
        let _ = writeln!(self.stderr, "{}", message);

        for frame in self.frames.iter().rev() {
            unsafe {
                let function = frame.function();
                let line = frame.current_line();
                if function.name.is_null() {
                    let _ = writeln!(self.stderr, "[line {}] in script", line);
                } else {
                    let _ = writeln!(
                        self.stderr,
                        "[line {}] in {}()",
                        line,
                        (*function.name).content
                    );
                }
            }
        }

        self.reset_stack();
    }

    pub fn define_native(&mut self, name: &str, function: NativeFn) {
        let name = self.copy_string(name);
        self.stack_push(make_object_value(name as *mut Object));
        let native = self.new_native_function(function);
        self.stack_push(make_object_value(native as *mut Object));

        let key = as_object(&self.stack_peek(1)) as *mut ObjectString;
        let value = self.stack_peek(0);
        self.globals.insert(key, value);
        self.stack_pop();
        self.stack_pop();
    }

    /// Interns `content`, copying it into a fresh heap string unless an
    /// equal one already exists.
    pub fn copy_string(&mut self, content: &str) -> *mut ObjectString {
        let hash = hash_string(content);
        let interned = self.strings.find_string(content, hash);
        if !interned.is_null() {
            return interned;
        }
        self.allocate_string(content.to_string(), hash)
    }

    /// Interns `content`, taking ownership of the buffer; an already
    /// interned equal string wins and the buffer is dropped.
    pub fn take_string(&mut self, content: String) -> *mut ObjectString {
        let hash = hash_string(&content);
        let interned = self.strings.find_string(&content, hash);
        if !interned.is_null() {
            return interned;
        }
        self.allocate_string(content, hash)
    }

    fn allocate_string(&mut self, content: String, hash: u32) -> *mut ObjectString {
        self.collect_if_needed();
        let string = self.objects.alloc_string(content, hash);
        // The pool insertion happens before anything else references the
        // string, so it rides in the protected slot until installed.
        self.objects.allocator.protected_object = string as *mut Object;
        self.strings.insert(string, make_nil_value());
        self.objects.allocator.protected_object = ptr::null_mut();
        string
    }

    /// Producer hook: a fresh, registered function whose chunk the
    /// compiler fills in. The producer keeps it rooted while building.
    pub fn new_function(&mut self) -> *mut ObjectFunction {
        self.collect_if_needed();
        self.objects.alloc_function()
    }

    pub(crate) fn new_closure(&mut self, function: *mut ObjectFunction) -> *mut ObjectClosure {
        self.collect_if_needed();
        self.objects.alloc_closure(function)
    }

    pub(crate) fn new_upvalue(&mut self, location: *mut Value) -> *mut ObjectUpvalue {
        self.collect_if_needed();
        self.objects.alloc_upvalue(location)
    }

    pub(crate) fn new_class(&mut self, name: *mut ObjectString) -> *mut ObjectClass {
        self.collect_if_needed();
        self.objects.alloc_class(name)
    }

    pub(crate) fn new_instance(&mut self, class: *mut ObjectClass) -> *mut ObjectInstance {
        self.collect_if_needed();
        self.objects.alloc_instance(class)
    }

    pub(crate) fn new_bound_method(
        &mut self,
        receiver: Value,
        method: *mut ObjectClosure,
    ) -> *mut ObjectBoundMethod {
        self.collect_if_needed();
        self.objects.alloc_bound_method(receiver, method)
    }

    fn new_native_function(&mut self, function: NativeFn) -> *mut ObjectNativeFunction {
        self.collect_if_needed();
        self.objects.alloc_native_function(function)
    }

    fn collect_if_needed(&mut self) {
        if self.objects.allocator.should_collect() {
            self.collect_garbage();
        }
    }

    /// Collections only ever start here, at an allocation point, when the
    /// stack top and frames are consistent.
    pub fn collect_garbage(&mut self) {
        let roots = RootSet {
            stack: &self.stack[..self.stack_top],
            frames: &self.frames,
            open_upvalues: self.open_upvalues,
            globals: &self.globals,
            init_string: self.init_string,
        };
        self.gc.collect(roots, &mut self.strings, &mut self.objects);
    }

    #[cfg(feature = "debug_trace_execution")]
    fn trace_instruction(&self) {
        use crate::value::print_value;

        if self.stack_top > 0 {
            print!("{: >10}", "");
            for slot in &self.stack[0..self.stack_top] {
                print!(" [ ");
                print_value(slot);
                print!(" ]");
            }
            println!();
        }
        if let Some(frame) = self.frames.last() {
            unsafe {
                crate::debug::disassemble_instruction(frame.chunk(), frame.ip);
            }
        }
    }
}

impl Default for VM {
    fn default() -> Self {
        VM::new()
    }
}

fn is_falsey(value: &Value) -> bool {
    is_nil(value) || (is_bool(value) && !as_bool(value))
}
