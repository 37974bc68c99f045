/// Spawns a task that reads `reader` line by line and forwards every
/// non-empty line over a bounded channel.
///
/// Lines are sent without their trailing newline (`\n` or `\r\n`). When the
/// channel is full the task waits, so a slow consumer slows the reader down.
/// Dropping the receiver stops the task early.
///
/// # Returns
/// - `JoinHandle<io::Result<usize>>`: resolves to the number of lines forwarded,
///   or the I/O error that stopped the reader.
/// - `mpsc::Receiver<String>`: the lines, in input order.
pub fn lines<R: tokio::io::AsyncRead + Unpin + Send + 'static>(
    reader: R,
    channel_capacity: usize,
) -> (
    tokio::task::JoinHandle<std::io::Result<usize>>,
    tokio::sync::mpsc::Receiver<String>,
) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let (tx, rx) = tokio::sync::mpsc::channel::<String>(channel_capacity);
    let mut input = BufReader::new(reader).lines();

    let task = tokio::spawn(async move {
        let mut forwarded = 0;
        while let Some(line) = input.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(line).await.is_err() {
                log::debug!("line consumer went away after {} lines", forwarded);
                break;
            }
            forwarded += 1;
        }
        Ok::<_, std::io::Error>(forwarded)
    });

    (task, rx)
}
