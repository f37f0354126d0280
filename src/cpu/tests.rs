use crate::{
    bus::Bus,
    cpu::{
        cpu::{CPU, PowerState},
        flags::Status,
        opcode::OpcodeTable,
        trace::{NullTracer, TraceLine},
    },
    error::{Error, Result},
};

struct TestBus {
    mem: [u8; 65536],
}

impl TestBus {
    fn new() -> Self {
        Self { mem: [0; 65536] }
    }
}

impl Bus for TestBus {
    fn read(&mut self, addr: u16) -> Result<u8> {
        Ok(self.mem[addr as usize])
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.mem[addr as usize] = data;
        Ok(())
    }
}

fn new_cpu(mut bus: TestBus) -> CPU<TestBus> {
    bus.mem[0xFFFC] = 0x00;
    bus.mem[0xFFFD] = 0x80;

    let mut cpu = CPU::new(bus).unwrap();
    cpu.sp.set(0xFF);
    cpu
}

/// Serve the latched reset so the next step runs from $8000.
fn boot(cpu: &mut CPU<TestBus>) {
    cpu.reset();
    step(cpu);
    assert_eq!(cpu.pc.get(), 0x8000);
}

fn step(cpu: &mut CPU<TestBus>) {
    cpu.step(&mut NullTracer).unwrap();
}

/// `LDA #a`, optional `SEC`, `ADC #s`.
fn adc(a: u8, s: u8, carry_in: bool) -> CPU<TestBus> {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #a
    bus.mem[0x8001] = a;
    bus.mem[0x8002] = if carry_in { 0x38 } else { 0x18 }; // SEC / CLC
    bus.mem[0x8003] = 0x69; // ADC #s
    bus.mem[0x8004] = s;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);
    cpu
}

#[test]
fn lda_immediate_loads_value() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$42
    bus.mem[0x8001] = 0x42;

    let mut cpu = new_cpu(bus);

    boot(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.a.get(), 0x42);
    assert!(!cpu.status.zero());
    assert!(!cpu.status.negative());
}

#[test]
fn lda_sets_zero_flag() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$00
    bus.mem[0x8001] = 0x00;

    let mut cpu = new_cpu(bus);

    boot(&mut cpu);
    step(&mut cpu);
    assert!(cpu.status.zero());
}

#[test]
fn lda_sets_negative_flag() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$80
    bus.mem[0x8001] = 0x80;

    let mut cpu = new_cpu(bus);

    boot(&mut cpu);
    step(&mut cpu); // LDA

    assert!(cpu.status.negative());
}

#[test]
fn ldx_immediate_then_stx_zero_page() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA2; // LDX #$42
    bus.mem[0x8001] = 0x42;
    bus.mem[0x8002] = 0x86; // STX $10
    bus.mem[0x8003] = 0x10;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.x.get(), 0x42);
    assert_eq!(cpu.bus.mem[0x0010], 0x42);
    assert_eq!(cpu.pc.get(), 0x8004);
}

#[test]
fn ldy_absolute_x() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA2; // LDX #$05
    bus.mem[0x8001] = 0x05;
    bus.mem[0x8002] = 0xBC; // LDY $0300,X
    bus.mem[0x8003] = 0x00;
    bus.mem[0x8004] = 0x03;
    bus.mem[0x0305] = 0x99;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.y.get(), 0x99);
    assert!(cpu.status.negative());
}

#[test]
fn tax_transfers_a_to_x() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$10
    bus.mem[0x8001] = 0x10;

    bus.mem[0x8002] = 0xAA; // TAX

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu); // LDA
    step(&mut cpu); // TAX

    assert_eq!(cpu.x.get(), 0x10)
}

#[test]
fn sta_writes_to_effective_address() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0xA9; // LDA #$33
    bus.mem[0x8001] = 0x33;

    bus.mem[0x8002] = 0x8D; // STA $0200
    bus.mem[0x8003] = 0x00;
    bus.mem[0x8004] = 0x02;

    // Byte currently at $0200, which must not be used as an address
    bus.mem[0x0200] = 0x44;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu); // LDA
    step(&mut cpu); // STA

    assert_eq!(cpu.bus.mem[0x0200], 0x33);
    assert_eq!(cpu.bus.mem[0x0044], 0x00);
}

#[test]
fn sta_indirect_modes() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$7E
    bus.mem[0x8001] = 0x7E;
    bus.mem[0x8002] = 0xA2; // LDX #$04
    bus.mem[0x8003] = 0x04;
    bus.mem[0x8004] = 0xA0; // LDY #$02
    bus.mem[0x8005] = 0x02;
    bus.mem[0x8006] = 0x81; // STA ($20,X)
    bus.mem[0x8007] = 0x20;
    bus.mem[0x8008] = 0x91; // STA ($40),Y
    bus.mem[0x8009] = 0x40;

    bus.mem[0x0024] = 0x00; // ($24) -> $0600
    bus.mem[0x0025] = 0x06;
    bus.mem[0x0040] = 0x00; // ($40) -> $0700, +Y
    bus.mem[0x0041] = 0x07;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    for _ in 0..5 {
        step(&mut cpu);
    }

    assert_eq!(cpu.bus.mem[0x0600], 0x7E);
    assert_eq!(cpu.bus.mem[0x0702], 0x7E);
}

#[test]
fn zero_page_indexing_wraps() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA2; // LDX #$FF
    bus.mem[0x8001] = 0xFF;
    bus.mem[0x8002] = 0xB5; // LDA $80,X
    bus.mem[0x8003] = 0x80;
    bus.mem[0x007F] = 0x5A;
    bus.mem[0x017F] = 0xFF;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.a.get(), 0x5A);
}

#[test]
fn jmp_changes_program_counter() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0x4C; // JMP $9000
    bus.mem[0x8001] = 0x00;
    bus.mem[0x8002] = 0x90;

    bus.mem[0x9000] = 0xA9; // LDA #$55
    bus.mem[0x9001] = 0x55;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu); // JMP
    step(&mut cpu); // LDA

    assert_eq!(cpu.a.get(), 0x55);
}

#[test]
fn jmp_indirect_does_not_cross_page() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0x6C; // JMP ($02FF)
    bus.mem[0x8001] = 0xFF;
    bus.mem[0x8002] = 0x02;
    bus.mem[0x02FF] = 0x34;
    bus.mem[0x0200] = 0x12;
    bus.mem[0x0300] = 0x56;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.pc.get(), 0x1234);
}

#[test]
fn inx_increments_x() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0xA2; // LDX #$01
    bus.mem[0x8001] = 0x01;
    bus.mem[0x8002] = 0xE8; // INX

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu); // LDX
    step(&mut cpu); // INX

    assert_eq!(cpu.x.get(), 0x02);
}

#[test]
fn index_registers_wrap() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA2; // LDX #$FF
    bus.mem[0x8001] = 0xFF;
    bus.mem[0x8002] = 0xE8; // INX
    bus.mem[0x8003] = 0x88; // DEY

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.x.get(), 0x00);
    assert!(cpu.status.zero());

    step(&mut cpu);
    assert_eq!(cpu.y.get(), 0xFF);
    assert!(cpu.status.negative());
}

#[test]
fn dex_sets_zero_flag() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0xA2; // LDX #$01
    bus.mem[0x8001] = 0x01;
    bus.mem[0x8002] = 0xCA; // DEX

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu); // LDX
    step(&mut cpu); // DEX

    assert!(cpu.status.zero());
}

#[test]
fn bne_loops_until_zero() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0xA2; // LDX #3
    bus.mem[0x8001] = 0x03;
    bus.mem[0x8002] = 0xCA; // DEX
    bus.mem[0x8003] = 0xD0; // BNE -3
    bus.mem[0x8004] = 0xFD; // -3 offset

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    for _ in 0..7 {
        step(&mut cpu);
    }

    assert_eq!(cpu.x.get(), 0x00);
    assert_eq!(cpu.pc.get(), 0x8005);
}

#[test]
fn adc_overflow_battery() {
    // (a, s) -> (result, carry, zero, negative, overflow)
    let cases = [
        (0x50, 0x10, 0x60, false, false, false, false),
        (0x50, 0x50, 0xA0, false, false, true, true),
        (0x50, 0x90, 0xE0, false, false, true, false),
        (0x50, 0xD0, 0x20, true, false, false, false),
        (0xD0, 0x10, 0xE0, false, false, true, false),
        (0xD0, 0xD0, 0xA0, true, false, true, false),
    ];

    for (a, s, result, carry, zero, negative, overflow) in cases {
        let cpu = adc(a, s, false);
        let tag = format!("{a:02X}+{s:02X}");
        assert_eq!(cpu.a.get(), result, "{tag}");
        assert_eq!(cpu.status.carry(), carry, "{tag} carry");
        assert_eq!(cpu.status.zero(), zero, "{tag} zero");
        assert_eq!(cpu.status.negative(), negative, "{tag} negative");
        assert_eq!(cpu.status.overflow(), overflow, "{tag} overflow");
    }
}

#[test]
fn adc_carry_in_and_zero_result() {
    let cpu = adc(0xFF, 0x00, true);
    assert_eq!(cpu.a.get(), 0x00);
    assert!(cpu.status.carry());
    assert!(cpu.status.zero());
    assert!(!cpu.status.overflow());
}

#[test]
fn sbc_subtracts_with_borrow() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$50
    bus.mem[0x8001] = 0x50;
    bus.mem[0x8002] = 0x38; // SEC
    bus.mem[0x8003] = 0xE9; // SBC #$F0
    bus.mem[0x8004] = 0xF0;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    for _ in 0..3 {
        step(&mut cpu);
    }

    assert_eq!(cpu.a.get(), 0x60);
    assert!(!cpu.status.carry());
    assert!(!cpu.status.overflow());
}

#[test]
fn cmp_sets_carry_and_zero() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$40
    bus.mem[0x8001] = 0x40;
    bus.mem[0x8002] = 0xC9; // CMP #$40
    bus.mem[0x8003] = 0x40;
    bus.mem[0x8004] = 0xC9; // CMP #$41
    bus.mem[0x8005] = 0x41;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);
    assert!(cpu.status.carry());
    assert!(cpu.status.zero());

    step(&mut cpu);
    assert!(!cpu.status.carry());
    assert!(!cpu.status.zero());
    assert!(cpu.status.negative());
}

#[test]
fn bit_copies_high_bits() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$01
    bus.mem[0x8001] = 0x01;
    bus.mem[0x8002] = 0x24; // BIT $10
    bus.mem[0x8003] = 0x10;
    bus.mem[0x0010] = 0xC0;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);

    assert!(cpu.status.negative());
    assert!(cpu.status.overflow());
    assert!(cpu.status.zero());
    assert_eq!(cpu.a.get(), 0x01);
}

#[test]
fn shifts_and_rotates() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$81
    bus.mem[0x8001] = 0x81;
    bus.mem[0x8002] = 0x0A; // ASL A
    bus.mem[0x8003] = 0x2A; // ROL A
    bus.mem[0x8004] = 0x46; // LSR $20
    bus.mem[0x8005] = 0x20;
    bus.mem[0x8006] = 0x66; // ROR $20
    bus.mem[0x8007] = 0x20;
    bus.mem[0x0020] = 0x03;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);

    step(&mut cpu);
    assert_eq!(cpu.a.get(), 0x02);
    assert!(cpu.status.carry());

    step(&mut cpu);
    assert_eq!(cpu.a.get(), 0x05);
    assert!(!cpu.status.carry());

    step(&mut cpu);
    assert_eq!(cpu.bus.mem[0x0020], 0x01);
    assert!(cpu.status.carry());

    step(&mut cpu);
    assert_eq!(cpu.bus.mem[0x0020], 0x80);
    assert!(cpu.status.carry());
    assert!(cpu.status.negative());
}

#[test]
fn inc_and_dec_memory() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xE6; // INC $30
    bus.mem[0x8001] = 0x30;
    bus.mem[0x8002] = 0xCE; // DEC $0400
    bus.mem[0x8003] = 0x00;
    bus.mem[0x8004] = 0x04;
    bus.mem[0x0030] = 0xFF;
    bus.mem[0x0400] = 0x00;

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.bus.mem[0x0030], 0x00);
    assert!(cpu.status.zero());

    step(&mut cpu);
    assert_eq!(cpu.bus.mem[0x0400], 0xFF);
    assert!(cpu.status.negative());
}

#[test]
fn beq_taken_and_not_taken() {
    for (zero, expected) in [(true, 0xC007), (false, 0xC002)] {
        let mut bus = TestBus::new();
        bus.mem[0xC000] = 0xF0; // BEQ +5
        bus.mem[0xC001] = 0x05;

        let mut cpu = new_cpu(bus);
        cpu.pc.set(0xC000);
        cpu.status.set(Status::ZERO, zero);
        step(&mut cpu);

        assert_eq!(cpu.pc.get(), expected);
    }
}

#[test]
fn backward_branch_is_sign_extended() {
    let mut bus = TestBus::new();
    bus.mem[0xC010] = 0x90; // BCC -16
    bus.mem[0xC011] = 0xF0;

    let mut cpu = new_cpu(bus);
    cpu.pc.set(0xC010);
    step(&mut cpu);

    assert_eq!(cpu.pc.get(), 0xC002);
}

#[test]
fn jsr_and_rts_work() {
    let mut bus = TestBus::new();

    // main program
    bus.mem[0x8000] = 0x20; // JSR $9000
    bus.mem[0x8001] = 0x00;
    bus.mem[0x8002] = 0x90;
    bus.mem[0x8003] = 0xA9; // LDA #$11
    bus.mem[0x8004] = 0x11;

    // subroutine
    bus.mem[0x9000] = 0xA9; // LDA #$22
    bus.mem[0x9001] = 0x22;
    bus.mem[0x9002] = 0x60; // RTS

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);

    step(&mut cpu); // JSR
    assert_eq!(cpu.pc.get(), 0x9000);
    assert_eq!(cpu.stack_address(), 0x01FD);
    assert_eq!(cpu.bus.mem[0x01FF], 0x80);
    assert_eq!(cpu.bus.mem[0x01FE], 0x03);

    step(&mut cpu); // LDA #$22
    step(&mut cpu); // RTS
    assert_eq!(cpu.pc.get(), 0x8003);
    assert_eq!(cpu.stack_address(), 0x01FF);

    step(&mut cpu); // LDA #$11
    assert_eq!(cpu.a.get(), 0x11);
}

#[test]
fn pha_pla_round_trip() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0xA9; // LDA #$80
    bus.mem[0x8001] = 0x80;
    bus.mem[0x8002] = 0x48; // PHA
    bus.mem[0x8003] = 0xA9; // LDA #$00
    bus.mem[0x8004] = 0x00;
    bus.mem[0x8005] = 0x68; // PLA

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    for _ in 0..4 {
        step(&mut cpu);
    }

    assert_eq!(cpu.a.get(), 0x80);
    assert!(cpu.status.negative());
    assert!(!cpu.status.zero());
    assert_eq!(cpu.sp.get(), 0xFF);
}

#[test]
fn php_pushes_hardware_layout() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0x38; // SEC
    bus.mem[0x8001] = 0x08; // PHP
    bus.mem[0x8002] = 0x18; // CLC
    bus.mem[0x8003] = 0x28; // PLP

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    cpu.status.insert(Status::NEGATIVE);
    step(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.bus.mem[0x01FF], 0b1011_0001);

    step(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.status, Status::CARRY | Status::NEGATIVE);
}

#[test]
fn brk_jumps_to_irq_vector_and_rti_returns() {
    let mut bus = TestBus::new();

    bus.mem[0x8000] = 0x00; // BRK
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;
    bus.mem[0x9000] = 0x40; // RTI

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    step(&mut cpu);

    assert_eq!(cpu.pc.get(), 0x9000);
    assert!(cpu.status.contains(Status::IRQ_DISABLE));
    assert_eq!(cpu.bus.mem[0x01FF], 0x80);
    assert_eq!(cpu.bus.mem[0x01FE], 0x02);
    assert_eq!(cpu.bus.mem[0x01FD] & 0x30, 0x30);

    step(&mut cpu);
    assert_eq!(cpu.pc.get(), 0x8002);
    assert!(!cpu.status.contains(Status::IRQ_DISABLE));
    assert!(!cpu.status.contains(Status::BREAK));
}

#[test]
fn flag_instructions() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0x78; // SEI
    bus.mem[0x8001] = 0xF8; // SED
    bus.mem[0x8002] = 0x58; // CLI
    bus.mem[0x8003] = 0xD8; // CLD
    bus.mem[0x8004] = 0xB8; // CLV

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    cpu.status.insert(Status::OVERFLOW);
    step(&mut cpu);
    step(&mut cpu);
    assert!(cpu.status.contains(Status::IRQ_DISABLE | Status::DECIMAL));

    step(&mut cpu);
    step(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.status, Status::empty());
}

#[test]
fn reset_jumps_through_vector() {
    let mut bus = TestBus::new();
    bus.mem[0xC000] = 0xEA;
    bus.mem[0xFFFC] = 0x34;
    bus.mem[0xFFFD] = 0x12;

    let mut cpu = CPU::new(bus).unwrap();
    cpu.pc.set(0xC000);
    assert_eq!(cpu.state(), PowerState::Running);

    cpu.reset();
    assert_eq!(cpu.state(), PowerState::ResetPending);

    let mut lines: Vec<TraceLine> = Vec::new();
    cpu.step(&mut lines).unwrap();

    assert_eq!(cpu.state(), PowerState::Running);
    assert_eq!(cpu.pc.get(), 0x1234);
    assert_eq!(lines[0].to_string(), "C000 JMP 1234 A:00 X:00 Y:00");
}

#[test]
fn stop_is_idempotent_and_power_on_resumes() {
    let mut cpu = CPU::new(TestBus::new()).unwrap();
    cpu.stop();
    cpu.stop();
    assert_eq!(cpu.state(), PowerState::Off);

    cpu.reset();
    assert_eq!(cpu.state(), PowerState::Off);

    cpu.power_on();
    assert_eq!(cpu.state(), PowerState::Running);
}

#[test]
fn run_starts_at_entry_point() {
    let mut bus = TestBus::new();
    bus.mem[0xC000] = 0xA2; // LDX #$42
    bus.mem[0xC001] = 0x42;
    bus.mem[0xC002] = 0xEA; // NOP

    let mut cpu = CPU::new(bus).unwrap();
    let mut lines: Vec<TraceLine> = Vec::new();
    let executed = cpu.run(2, &mut lines).unwrap();

    assert_eq!(executed, 2);
    assert_eq!(cpu.pc.get(), 0xC003);
    assert_eq!(cpu.stack_address(), 0x01FF);
    assert_eq!(cpu.state(), PowerState::Off);
    assert_eq!(cpu.last_instruction_offset(), 0xC002);
    assert_eq!(
        lines.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
        ["C000 0xA2 42 A:00 X:00 Y:00", "C002 0xEA A:00 X:42 Y:00"]
    );
}

#[test]
fn run_with_zero_budget_only_initialises() {
    let mut cpu = CPU::new(TestBus::new()).unwrap();
    assert_eq!(cpu.run(0, &mut NullTracer).unwrap(), 0);
    assert_eq!(cpu.pc.get(), 0xC000);
    assert_eq!(cpu.stack_address(), 0x01FF);
}

#[test]
fn unknown_opcode_aborts_run() {
    let mut bus = TestBus::new();
    bus.mem[0xC000] = 0xEA; // NOP
    bus.mem[0xC001] = 0x02; // illegal

    let mut cpu = CPU::new(bus).unwrap();
    let err = cpu.run(10, &mut NullTracer).unwrap_err();

    match err {
        Error::UnknownOperation(msg) => assert!(msg.contains("0x02") && msg.contains("0xC001")),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(cpu.state(), PowerState::Off);
}

#[test]
fn illegal_mode_from_custom_table_is_rejected() {
    let table = OpcodeTable::parse("0xEA = STA;IMMEDIATE").unwrap();
    let mut bus = TestBus::new();
    bus.mem[0x0000] = 0xEA;
    bus.mem[0x0001] = 0x10;

    let mut cpu = CPU::with_table(bus, table);
    let err = cpu.step(&mut NullTracer).unwrap_err();
    assert!(err.is_unknown_operation());
    assert_eq!(cpu.bus.mem[0x0010], 0x00);
}

#[test]
fn execute_before_fetch_is_not_initialised() {
    let mut cpu = CPU::new(TestBus::new()).unwrap();
    assert!(matches!(cpu.execute(), Err(Error::NotInitialised)));
}

#[test]
fn stack_overflow_is_reported() {
    let mut bus = TestBus::new();
    bus.mem[0x8000] = 0x48; // PHA

    let mut cpu = new_cpu(bus);
    boot(&mut cpu);
    cpu.sp.set(0x00);

    let err = cpu.step(&mut NullTracer).unwrap_err();
    assert!(matches!(err, Error::RegisterUnderflow { width: 8, .. }));
    assert_eq!(cpu.sp.get(), 0x00);
}
