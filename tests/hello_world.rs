use bfvm::{
    machine::io::ByteInput,
    Exit, Machine, HELLO_WORLD,
};

#[test]
fn hello_world_at_an_offset() {
    let mut machine = Machine::with_io(150, ByteInput::new(&b""[..]), Vec::new());
    let diagnostics = machine.load(HELLO_WORLD, 6).unwrap();
    assert!(diagnostics.is_empty());

    machine.run(6).unwrap();
    assert!(!machine.is_running());

    let (_, output) = machine.into_parts();
    assert_eq!(String::from_utf8(output).unwrap(), "Hello World!\n");
}

#[test]
fn commented_source_runs_the_same() {
    let source = format!("greeting program\n{HELLO_WORLD}\nthat's all");
    let mut machine = Machine::with_io(0, ByteInput::new(&b""[..]), Vec::new());
    let diagnostics = machine.load(&source, 500).unwrap();
    assert_eq!(diagnostics.len(), 4);

    assert_eq!(machine.run_bounded(500, 10_000).unwrap(), Exit::Halted);
    assert_eq!(machine.output(), b"Hello World!\n");
}

#[test]
fn echo_program_copies_input() {
    let mut machine = Machine::with_io(0, ByteInput::new(&b"bf\n"[..]), Vec::new());
    // read until the newline (10) comes back as zero after subtracting it
    machine.load(",----------[++++++++++.,----------]", 100).unwrap();
    machine.run(100).unwrap();
    assert_eq!(machine.output(), b"bf");
}
