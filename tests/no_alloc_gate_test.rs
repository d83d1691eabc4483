use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use blocktris::core::{GameSnapshot, Session};
use blocktris::types::{Command, SessionState, CLEAR_DELAY_MS};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn session_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut session = Session::new(1, false);
    session.apply(Command::Start { level: 0 });
    let mut snap = GameSnapshot::default();

    // Warm-up.
    session.advance(16);
    session.apply(Command::MoveLeft);

    let allocs = with_alloc_counting(|| {
        // Gravity ticks.
        for _ in 0..200 {
            session.advance(16);
        }

        for _ in 0..50 {
            session.apply(Command::MoveLeft);
            session.apply(Command::MoveRight);
            session.apply(Command::Rotate { clockwise: true });
            session.apply(Command::Rotate { clockwise: false });
        }

        // Hard drop drives lock, sweep, spawn and the deferred removal.
        for _ in 0..25 {
            session.apply(Command::HardDrop);
            session.advance(CLEAR_DELAY_MS);
            session.snapshot_into(&mut snap);
            if session.state() == SessionState::GameOver {
                session.apply(Command::Start { level: 0 });
            }
        }
    });

    assert_eq!(allocs, 0);
}
