use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::prelude::*;
use std::io::LineWriter;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{LevelFilter, Log, Metadata, Record};

use crate::mhc::errors::PipelineError;

const WAIT_DURATION: Duration = Duration::from_millis(10);
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Backend of the `log` facade. Messages are queued by the calling thread and
/// written by a background thread to stdout and, if given, to a log file.
/// `flush()` blocks until every queued message is written.
pub struct AsyncQueuedLogger {
    level: LevelFilter,
    queue: Arc<Mutex<VecDeque<String>>>,
    // messages pushed but not yet written
    pending: Arc<AtomicUsize>,
    stop_flag: Arc<Mutex<bool>>,
    // set by the writer thread on exit
    finished: Arc<AtomicBool>,
    thread_handle: Mutex<Option<thread::JoinHandle<()>>>   // 'option dance' for joining in drop
}

impl AsyncQueuedLogger {
    pub fn new(log_file_path: Option<&str>, level: LevelFilter) -> io::Result<AsyncQueuedLogger> {
        // the file is opened here, so a bad path is reported to the caller instead of the thread
        let log_file: Option<LineWriter<File>> = match log_file_path {
            Some(path) => Some(LineWriter::new(OpenOptions::new().write(true).create(true).truncate(true).open(path)?)),
            None => None
        };
        // create atomic pointer for logger with clones for thread (prefixed with 't')
        let stop_flag = Arc::new(Mutex::new(false));
        let t_stop_flag = stop_flag.clone();
        let queue: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
        let t_queue = queue.clone();
        let pending = Arc::new(AtomicUsize::new(0));
        let t_pending = pending.clone();
        let finished = Arc::new(AtomicBool::new(false));
        let t_finished = finished.clone();
        let t_log_file_path = log_file_path.unwrap_or("stdout").to_owned();
        let thread_handle = thread::spawn(move || {
            let mut log_file = log_file;
            loop {
                let message = match t_queue.lock() {
                    Ok(mut queue) => queue.pop_front(),
                    Err(_) => {
                        println!("AsyncQueuedLogger [{}] ERROR: tried to lock a poisoned mutex for 'queue'", &t_log_file_path);
                        break;
                    }
                };
                match message {
                    Some(message) => {
                        println!("{}", &message);
                        if let Some(ref mut file) = log_file {
                            if let Err(err) = writeln!(file, "{}", &message) {
                                println!("AsyncQueuedLogger [{}] ERROR: {:?}", &t_log_file_path, err);
                            }
                        }
                        t_pending.fetch_sub(1, Ordering::SeqCst);
                    },
                    None => {
                        // stop only when the queue is drained
                        match t_stop_flag.lock() {
                            Ok(stop) if *stop => break,
                            Ok(_) => (),
                            Err(_) => break
                        }
                        thread::sleep(WAIT_DURATION);
                    }
                }
            }
            if let Some(ref mut file) = log_file {
                if let Err(err) = file.flush() {
                    println!("AsyncQueuedLogger [{}] ERROR: {:?}", &t_log_file_path, err);
                }
            }
            t_finished.store(true, Ordering::SeqCst);
        });
        return Ok(AsyncQueuedLogger {
            level: level,
            queue: queue,
            pending: pending,
            stop_flag: stop_flag,
            finished: finished,
            thread_handle: Mutex::new(Some(thread_handle))
        });
    }

    pub fn push_back(&self, message: String) -> usize {
        match self.queue.lock() {
            Ok(mut queue) => {
                self.pending.fetch_add(1, Ordering::SeqCst);
                queue.push_back(message);
                return queue.len();
            },
            Err(_) => {
                println!("AsyncQueuedLogger::push_back() tried to lock a poisoned mutex for 'queue', message dropped: {}", message);
                return 0;
            }
        }
    }

    /// Waits until all queued messages are written and stops the writer thread.
    pub fn stop(&self) {
        match self.stop_flag.lock() {
            Ok(mut stop) => *stop = true,
            Err(_) => println!("AsyncQueuedLogger::stop() tried to lock a poisoned mutex for 'stop_flag'")
        }
        let handle = match self.thread_handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(_) => None
        };
        if let Some(handle) = handle {
            if let Err(err) = handle.join() {
                println!("AsyncQueuedLogger::stop() error at handle.join(): {:?}", err);
            }
        }
    }
}

impl Log for AsyncQueuedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        return metadata.level() <= self.level;
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = time::strftime(TIMESTAMP_FORMAT, &time::now()).unwrap_or_default();
        self.push_back(format!("{} {:<5} {}", timestamp, record.level(), record.args()));
    }

    fn flush(&self) {
        // messages still pending once the writer is gone are never written
        while self.pending.load(Ordering::SeqCst) > 0 && !self.finished.load(Ordering::SeqCst) {
            thread::sleep(WAIT_DURATION);
        }
    }
}

// 'Destructor' which waits for the writer thread
impl Drop for AsyncQueuedLogger {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Installs the logger as backend of the `log` facade.
pub fn init(log_file_path: Option<&str>, level: LevelFilter) -> Result<(), PipelineError> {
    let logger = AsyncQueuedLogger::new(log_file_path, level)
        .map_err(|err| PipelineError::io(log_file_path.unwrap_or("stdout"), err))?;
    log::set_boxed_logger(Box::new(logger))
        .map_err(|err| PipelineError::Argument(format!("could not install logger: {}", err)))?;
    log::set_max_level(level);
    return Ok(());
}
