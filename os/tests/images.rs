//! 运行 `user/` 下的示例映像

use std::path::PathBuf;
use vmsim::Kernel;
use vmsim::config::KernelConfig;
use vmsim::loader::load_image;

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../user").join(name)
}

fn run(config: KernelConfig, names: &[&str]) -> vmsim::RunReport {
    let mut kernel = Kernel::new(config).unwrap();
    for name in names {
        let image = load_image(&sample(name), config.instruction_size).unwrap();
        kernel.spawn(image).unwrap();
    }
    kernel.run().unwrap()
}

#[test]
fn test_samples_final_registers() {
    let report = run(KernelConfig::default(), &["sum.txt", "memory.txt", "faulty.txt"]);
    assert_eq!(report.steps, 4 + 5 + 3);

    let regs = |pid: u32| {
        report
            .finished
            .iter()
            .find(|f| f.pid == pid)
            .map(|f| f.registers.as_slice().to_vec())
            .unwrap()
    };
    assert_eq!(regs(0), vec![10, 32, 42, 84, 0, 0, 0, 0]);
    assert_eq!(regs(1), vec![0, 1234, 2468, 0, 0, 0, 0, 0]);
    assert_eq!(regs(2), vec![5, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_samples_in_a_single_frame() {
    let config = KernelConfig::default().with_mm(mm::MmConfig::new(64, 64));
    let report = run(config, &["memory.txt", "sum.txt"]);
    let memory = &report.finished.iter().find(|f| f.pid == 0).unwrap().registers;
    assert_eq!(memory[1], 1234);
    assert!(report.stats.dirty_flushes >= 1);
    assert!(report.stats.backing_restores >= 1);
}
