//! Bounded fan-out over a batch of independent jobs.
use crossbeam_channel::unbounded;
use std::thread;

/// Run `job` once per input on at most `max_in_flight` scoped worker threads,
/// wait for all of them and return the outputs in input order.
///
/// Workers pull the next input index from a shared queue, so a slow job only
/// occupies its own worker.
pub fn run_bounded<I, O, F>(inputs: &[I], max_in_flight: usize, job: F) -> Vec<O>
where
    I: Sync,
    O: Send,
    F: Fn(&I) -> O + Sync,
{
    run_bounded_while(inputs, max_in_flight, || true, job)
        .into_iter()
        .flatten()
        .collect()
}

/// Like [`run_bounded`], but workers check `keep_going` before each job and
/// stop pulling work once it returns `false`. Jobs in flight run to completion;
/// skipped inputs come back as `None`.
pub fn run_bounded_while<I, O, C, F>(
    inputs: &[I],
    max_in_flight: usize,
    keep_going: C,
    job: F,
) -> Vec<Option<O>>
where
    I: Sync,
    O: Send,
    C: Fn() -> bool + Sync,
    F: Fn(&I) -> O + Sync,
{
    if inputs.is_empty() {
        return Vec::new();
    }
    let workers = max_in_flight.clamp(1, inputs.len());

    let (job_tx, job_rx) = unbounded::<usize>();
    for index in 0..inputs.len() {
        // The receiver is alive until the scope below ends.
        let _ = job_tx.send(index);
    }
    drop(job_tx);

    let (result_tx, result_rx) = unbounded::<(usize, O)>();
    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let (job, keep_going) = (&job, &keep_going);
            scope.spawn(move || {
                for index in job_rx.iter() {
                    if !keep_going() {
                        break;
                    }
                    if result_tx.send((index, job(&inputs[index]))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<O>> = (0..inputs.len()).map(|_| None).collect();
    for (index, output) in result_rx.try_iter() {
        slots[index] = Some(output);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_outputs_keep_input_order() {
        let inputs: Vec<u64> = (0..25).collect();
        let outputs = run_bounded(&inputs, 10, |n| {
            // Later inputs finish first.
            thread::sleep(Duration::from_millis(30 - *n));
            n * 2
        });
        assert_eq!(outputs, inputs.iter().map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_in_flight_never_exceeds_bound() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let inputs: Vec<usize> = (0..40).collect();

        let outputs = run_bounded(&inputs, 4, |n| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            *n
        });

        assert_eq!(outputs.len(), 40);
        assert!(peak.load(Ordering::SeqCst) <= 4);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_empty_batch_and_zero_bound() {
        let none: Vec<u8> = Vec::new();
        assert!(run_bounded(&none, 10, |n| *n).is_empty());
        assert_eq!(run_bounded(&[1, 2, 3], 0, |n| n + 1), vec![2, 3, 4]);
    }

    #[test]
    fn test_stopping_skips_queued_jobs() {
        let started = AtomicUsize::new(0);
        let inputs: Vec<usize> = (0..20).collect();

        let outputs = run_bounded_while(
            &inputs,
            2,
            || started.load(Ordering::SeqCst) < 4,
            |n| {
                started.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5));
                *n
            },
        );

        assert_eq!(outputs.len(), 20);
        let ran = outputs.iter().filter(|o| o.is_some()).count();
        assert!((4..=5).contains(&ran), "ran {} jobs", ran);
        assert_eq!(started.load(Ordering::SeqCst), ran);
        assert_eq!(outputs[0], Some(0));
        assert_eq!(outputs[19], None);
    }
}
