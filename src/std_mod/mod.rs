pub mod time;

use phf::phf_map;

use crate::objects::object_native_function::NativeFn;
use crate::vm::VM;

/// Built-in natives installed into globals at VM startup.
static NATIVES: phf::Map<&'static str, NativeFn> = phf_map! {
    "clock" => time::clock as NativeFn,
};

pub fn install(vm: &mut VM) {
    for (name, function) in NATIVES.entries() {
        vm.define_native(name, *function);
    }
}
