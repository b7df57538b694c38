// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-writer state cells.
//!
//! Session, locale and theme each live in one cell. The component that owns
//! a cell holds its [`CellWriter`], which is deliberately not `Clone`;
//! everything else observes through [`CellReader`] handles.

use tokio::sync::watch;

/// Creates a cell holding `initial` and returns its writer and a reader.
pub fn cell<T>(initial: T) -> (CellWriter<T>, CellReader<T>) {
	let (tx, rx) = watch::channel(initial);
	(CellWriter { tx }, CellReader { rx })
}

/// Exclusive write handle for a state cell.
#[derive(Debug)]
pub struct CellWriter<T> {
	tx: watch::Sender<T>,
}

impl<T> CellWriter<T> {
	/// Replaces the value and notifies readers.
	pub fn set(&self, value: T) {
		self.tx.send_replace(value);
	}

	/// Mutates the value in place and notifies readers once.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		self.tx.send_modify(f);
	}

	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.tx.borrow().clone()
	}

	pub fn reader(&self) -> CellReader<T> {
		CellReader {
			rx: self.tx.subscribe(),
		}
	}
}

/// Read-only handle for a state cell.
#[derive(Debug, Clone)]
pub struct CellReader<T> {
	rx: watch::Receiver<T>,
}

impl<T> CellReader<T> {
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.rx.borrow().clone()
	}

	/// Reads the value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.rx.borrow())
	}

	/// Waits for the next write. Returns `false` once the writer is gone.
	pub async fn changed(&mut self) -> bool {
		self.rx.changed().await.is_ok()
	}

	/// Waits until the value satisfies `predicate` and returns a copy of it.
	pub async fn wait_for(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T>
	where
		T: Clone,
	{
		self.rx.wait_for(predicate).await.ok().map(|value| value.clone())
	}
}
