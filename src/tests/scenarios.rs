//! Scenario tests over real OS threads.

use crate::sched::{Departure, RoundRobinScheduler, Turn};
use crate::thread::{current_handle, HostParker, ThreadHandle, ThreadState};
use alloc::sync::Arc;
use alloc::vec::Vec;
use portable_atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

type Sched = RoundRobinScheduler<HostParker>;

const TIMEOUT: Duration = Duration::from_secs(10);

fn scheduler() -> Arc<Sched> {
    Arc::new(RoundRobinScheduler::new(HostParker::new()))
}

fn wait_for(what: &str, cond: impl Fn() -> bool) {
    let start = Instant::now();
    while !cond() {
        assert!(start.elapsed() < TIMEOUT, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn ring_len(sched: &Sched, cid: u64) -> usize {
    sched.group_members(cid).map_or(0, |m| m.len())
}

/// Threads of one container taking turns, recording who ran when.
struct Crew {
    members: Vec<JoinHandle<()>>,
    log: Arc<spin::Mutex<Vec<usize>>>,
}

impl Crew {
    /// Register `size` threads in `cid` in index order, then let each run
    /// `rounds` turns before leaving.
    fn launch(sched: &Arc<Sched>, cid: u64, size: usize, rounds: usize) -> Self {
        let log = Arc::new(spin::Mutex::new(Vec::new()));
        let active = Arc::new(AtomicUsize::new(0));
        let mut members = Vec::new();

        for index in 0..size {
            let member_sched = sched.clone();
            let log = log.clone();
            let active = active.clone();
            let member = std::thread::Builder::new()
                .name(std::format!("c{}-m{}", cid, index))
                .spawn(move || {
                    let turn = member_sched.register(cid).unwrap();
                    if index == 0 {
                        assert_eq!(turn, Turn::Granted);
                        wait_for("full ring", || ring_len(&member_sched, cid) == size);
                    } else {
                        assert_eq!(turn, Turn::Resumed);
                    }

                    for _ in 0..rounds {
                        assert_eq!(active.fetch_add(1, Ordering::SeqCst), 0, "two members running");
                        log.lock().push(index);
                        active.fetch_sub(1, Ordering::SeqCst);
                        assert_eq!(member_sched.yield_turn(cid).unwrap(), Turn::Resumed);
                    }
                    assert_ne!(member_sched.deregister(cid).unwrap(), Departure::Unlinked);
                })
                .unwrap();
            members.push(member);
            wait_for("member to join", || ring_len(sched, cid) == index + 1);
        }

        Self { members, log }
    }

    fn finish(self) -> Vec<usize> {
        for member in self.members {
            member.join().unwrap();
        }
        let log = self.log.lock();
        log.clone()
    }
}

fn round_robin(size: usize, rounds: usize) -> Vec<usize> {
    (0..rounds).flat_map(|_| 0..size).collect()
}

#[test]
fn test_round_robin_hand_off_wraps() {
    let sched = scheduler();
    let log = Crew::launch(&sched, 7, 3, 2).finish();

    // T1 -> T2 -> T3 -> T1 (wrap) -> ...
    assert_eq!(log, round_robin(3, 2));
    assert_eq!(sched.stats().groups, 0);
    assert_eq!(sched.stats().handoffs, 6);
}

#[test]
fn test_containers_rotate_independently() {
    let sched = scheduler();
    let first = Crew::launch(&sched, 1, 2, 20);
    let second = Crew::launch(&sched, 2, 4, 10);

    assert_eq!(first.finish(), round_robin(2, 20));
    assert_eq!(second.finish(), round_robin(4, 10));

    let stats = sched.stats();
    assert_eq!(stats.groups, 0);
    assert_eq!(stats.members, 0);
}

#[test]
fn test_lone_member_yield_does_not_suspend() {
    let sched = scheduler();
    assert_eq!(sched.register(9), Ok(Turn::Granted));
    assert_eq!(sched.yield_turn(9), Ok(Turn::Kept));
    assert_eq!(sched.yield_turn(9), Ok(Turn::Kept));
    assert_eq!(current_handle().state(), ThreadState::Running);
    assert_eq!(sched.stats().handoffs, 0);
    assert_eq!(sched.deregister(9), Ok(Departure::Teardown));
}

/// Spawn a thread that reports its handle, registers in `cid`, reports
/// that it is running, then waits for `go` before deregistering.
fn spawn_waiter(
    sched: &Arc<Sched>,
    cid: u64,
    running: mpsc::Sender<ThreadHandle>,
) -> (ThreadHandle, mpsc::Sender<()>, JoinHandle<()>) {
    let (handle_tx, handle_rx) = mpsc::channel();
    let (go_tx, go_rx) = mpsc::channel::<()>();
    let sched = sched.clone();
    let thread = std::thread::spawn(move || {
        let me = current_handle();
        handle_tx.send(me.clone()).unwrap();
        assert_eq!(sched.register(cid).unwrap(), Turn::Resumed);
        running.send(me).unwrap();
        go_rx.recv().unwrap();
        sched.deregister(cid).unwrap();
    });
    (handle_rx.recv().unwrap(), go_tx, thread)
}

#[test]
fn test_deregister_promotes_successor() {
    let sched = scheduler();
    let t1 = current_handle();
    assert_eq!(sched.register(3), Ok(Turn::Granted));

    let (running_tx, running_rx) = mpsc::channel();
    let (t2, go2, join2) = spawn_waiter(&sched, 3, running_tx.clone());
    wait_for("t2 queued", || ring_len(&sched, 3) == 2);
    let (t3, go3, join3) = spawn_waiter(&sched, 3, running_tx);
    wait_for("t3 queued", || ring_len(&sched, 3) == 3);
    wait_for("t2 parked", || t2.state() == ThreadState::Suspended);
    wait_for("t3 parked", || t3.state() == ThreadState::Suspended);

    assert_eq!(sched.current_of(3), Some(t1.clone()));
    assert_eq!(sched.deregister(3), Ok(Departure::Handoff));
    assert!(!sched.is_registered(&t1));
    assert_eq!(sched.group_members(3), Some(alloc::vec![t2.clone(), t3.clone()]));
    assert_eq!(sched.current_of(3), Some(t2.clone()));

    // Only the successor wakes.
    assert_eq!(running_rx.recv_timeout(TIMEOUT).unwrap(), t2);
    assert_eq!(t3.state(), ThreadState::Suspended);
    assert!(running_rx.try_recv().is_err());

    go2.send(()).unwrap();
    assert_eq!(running_rx.recv_timeout(TIMEOUT).unwrap(), t3);
    go3.send(()).unwrap();

    join2.join().unwrap();
    join3.join().unwrap();
    assert_eq!(sched.stats().groups, 0);
}

#[test]
fn test_last_member_teardown_allows_fresh_container() {
    let sched = scheduler();
    assert_eq!(sched.register(5), Ok(Turn::Granted));
    assert_eq!(sched.deregister(5), Ok(Departure::Teardown));
    assert!(sched.group_members(5).is_none());
    assert_eq!(sched.stats().groups, 0);

    let newcomer = {
        let sched = sched.clone();
        std::thread::spawn(move || {
            let me = current_handle();
            assert_eq!(sched.register(5), Ok(Turn::Granted));
            assert_eq!(sched.current_of(5), Some(me));
            assert_eq!(sched.deregister(5), Ok(Departure::Teardown));
        })
    };
    newcomer.join().unwrap();
    assert_eq!(sched.stats().members, 0);
}

#[test]
fn test_register_deregister_churn_leaves_nothing_behind() {
    const THREADS: usize = 8;
    const CYCLES: usize = 40;

    let sched = scheduler();
    let workers: Vec<_> = (0..THREADS)
        .map(|worker| {
            let sched = sched.clone();
            std::thread::spawn(move || {
                for cycle in 0..CYCLES {
                    let cid = ((worker + cycle) % 3) as u64;
                    sched.register(cid).unwrap();
                    let me = current_handle();
                    assert_eq!(sched.current_of(cid), Some(me));
                    let departure = sched.deregister(cid).unwrap();
                    assert!(matches!(departure, Departure::Teardown | Departure::Handoff));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let stats = sched.stats();
    assert_eq!(stats.groups, 0);
    assert_eq!(stats.members, 0);
    assert_eq!(stats.registrations, (THREADS * CYCLES) as u64);
    assert_eq!(stats.deregistrations, (THREADS * CYCLES) as u64);
}

#[test]
fn test_default_kernel_round_trip() {
    let cid = 0xC0FFEE;
    crate::register(cid).unwrap();
    crate::yield_turn(cid).unwrap();
    assert!(crate::default_kernel()
        .scheduler()
        .is_registered(&current_handle()));
    crate::deregister(cid).unwrap();
    assert!(crate::default_kernel().scheduler().group_members(cid).is_none());
}
