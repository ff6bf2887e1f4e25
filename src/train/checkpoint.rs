//! Checkpoint artifact naming.

/// Build the checkpoint filename for one epoch.
///
/// The epoch index and the two losses are baked into the name so operators
/// can pick a checkpoint by eye; the tag is only ever an artifact name, never
/// parsed back.
pub fn checkpoint_filename(epoch: usize, train_loss: f32, val_loss: f32) -> String {
    format!("model_v{epoch}_devloss_{val_loss:.2}_trainloss_{train_loss:.2}.json")
}
