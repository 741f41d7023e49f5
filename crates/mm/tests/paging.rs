//! 多进程共享帧池时的分页行为

use mm::{MemoryManager, MmConfig, PagingError, ProcessImage, Vaddr, Vpn};
use test_support::pattern;

const PAGE: usize = 32;

fn manager(frames: usize, backing: Option<usize>) -> MemoryManager {
    let mut config = MmConfig::new(PAGE, PAGE * frames);
    if let Some(pages) = backing {
        config = config.with_backing_pages(pages);
    }
    MemoryManager::new(config)
}

fn text_image(pid: u8, pages: usize) -> ProcessImage {
    ProcessImage::new(PAGE * pages, pattern::bytes(pid, PAGE * pages)).unwrap()
}

#[test]
fn test_fifo_across_processes() {
    let mut mm = manager(2, None);
    for pid in 0..3u32 {
        mm.create_space(pid, text_image(pid as u8, 1)).unwrap();
    }

    let mut buf = [0u8; 8];
    for pid in 0..3u32 {
        mm.read(pid, Vaddr(0), &mut buf).unwrap();
        assert!(mm.verify_bindings());
    }
    assert!(mm.frames().lookup(0, Vpn(0)).is_none());
    assert!(mm.frames().lookup(1, Vpn(0)).is_some());

    // 重新访问 pid 0：内容与映像一致，淘汰次老的 pid 1
    let mut page = vec![0u8; PAGE];
    mm.read(0, Vaddr(0), &mut page).unwrap();
    assert_eq!(page, pattern::bytes(0, PAGE));
    assert!(mm.frames().lookup(1, Vpn(0)).is_none());
    assert!(mm.frames().lookup(2, Vpn(0)).is_some());
    assert_eq!(mm.stats().evictions, 2);
    assert!(mm.verify_bindings());
}

#[test]
fn test_data_survives_repeated_eviction() {
    let mut mm = manager(1, None);
    mm.create_space(7, ProcessImage::new(PAGE * 3, Vec::new()).unwrap())
        .unwrap();

    for round in 0..3u8 {
        for vpn in 0..3usize {
            let addr = Vaddr(vpn * PAGE + 4);
            if round > 0 {
                let mut word = [0u8; 4];
                mm.read(7, addr, &mut word).unwrap();
                assert_eq!(word, [round - 1, vpn as u8, 0, 0]);
            }
            mm.write(7, addr, &[round, vpn as u8, 0, 0]).unwrap();
        }
    }
    // 每页一个槽位，重复写回不需要新容量
    assert_eq!(mm.space(7).unwrap().backing().len(), 3);
    assert!(mm.verify_bindings());
}

#[test]
fn test_zero_backing_blocks_dirty_eviction() {
    let mut mm = manager(1, Some(0));
    mm.create_space(1, ProcessImage::new(PAGE * 2, Vec::new()).unwrap())
        .unwrap();

    mm.write(1, Vaddr(0), &[42]).unwrap();
    let mut buf = [0u8; 1];
    let err = mm.read(1, Vaddr(PAGE), &mut buf).unwrap_err();
    assert_eq!(err, PagingError::FrameExhausted { pid: 1, vpn: 0 });
    assert!(err.is_fatal());

    // 失败后原页保持驻留
    mm.read(1, Vaddr(0), &mut buf).unwrap();
    assert_eq!(buf, [42]);
    assert!(mm.verify_bindings());
}

#[test]
fn test_misaligned_and_out_of_range() {
    let mut mm = manager(2, None);
    mm.create_space(0, text_image(1, 2)).unwrap();

    let mut buf = [0u8; 8];
    let err = mm.read(0, Vaddr(PAGE - 4), &mut buf).unwrap_err();
    assert_eq!(
        err,
        PagingError::Misaligned {
            vaddr: PAGE - 4,
            len: 8
        }
    );
    assert!(err.is_fatal());

    let err = mm.read(0, Vaddr(PAGE * 2), &mut buf).unwrap_err();
    assert_eq!(
        err,
        PagingError::OutOfRange {
            vaddr: PAGE * 2,
            pages: 2
        }
    );
    assert!(!err.is_fatal());
    assert_eq!(mm.stats().page_faults, 0);
}
