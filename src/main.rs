use ember::chunk::OpCode;
use ember::objects::object::Object;
use ember::value::{make_number_value, make_object_value};
use ember::vm::{InterpretResult, VM};

/// Hand-assembles a tiny smoke program (a greeting concatenation and
/// `print 1 + 2 * 3;`) through the producer API and runs it. Real
/// programs arrive from a compiler as finished functions.
fn main() {
    let mut vm = VM::new();

    let function = vm.new_function();
    vm.stack_push(make_object_value(function as *mut Object));
    unsafe {
        let greeting = vm.copy_string("ember ");
        let greeting_const = (*function)
            .chunk
            .add_constant(make_object_value(greeting as *mut Object)) as u8;
        let version = vm.copy_string("0.1.0");
        let version_const = (*function)
            .chunk
            .add_constant(make_object_value(version as *mut Object)) as u8;

        let chunk = &mut (*function).chunk;
        let one = chunk.add_constant(make_number_value(1.0)) as u8;
        let two = chunk.add_constant(make_number_value(2.0)) as u8;
        let three = chunk.add_constant(make_number_value(3.0)) as u8;

        chunk.write_op(OpCode::Constant, 1);
        chunk.write(greeting_const, 1);
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(version_const, 1);
        chunk.write_op(OpCode::Add, 1);
        chunk.write_op(OpCode::Print, 1);

        chunk.write_op(OpCode::Constant, 2);
        chunk.write(one, 2);
        chunk.write_op(OpCode::Constant, 2);
        chunk.write(two, 2);
        chunk.write_op(OpCode::Constant, 2);
        chunk.write(three, 2);
        chunk.write_op(OpCode::Multiply, 2);
        chunk.write_op(OpCode::Add, 2);
        chunk.write_op(OpCode::Print, 2);

        chunk.write_op(OpCode::Nil, 3);
        chunk.write_op(OpCode::Return, 3);
    }
    vm.stack_pop();

    #[cfg(feature = "debug_print_code")]
    ember::debug::disassemble_chunk(unsafe { &(*function).chunk }, "script");

    match vm.interpret(function) {
        InterpretResult::InterpretOk => {}
        _ => std::process::exit(70),
    }
}
