//! Ordered task collection bound to a JSON file

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::task::Task;

/// The task list and the file it is mirrored to.
///
/// Every mutation rewrites the whole file before returning. Indices are
/// positional only: removing a task shifts every later task down by one.
/// A single process is assumed to own the file; there is no locking.
#[derive(Debug)]
pub struct TaskList {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskList {
    /// Loads the list stored at `path`. A missing file yields an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = load_tasks(&path)?;
        debug!("Loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Self { path, tasks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add_task(&mut self, task: Task) -> Result<()> {
        info!("Adding task: {}", task.description);
        self.tasks.push(task);
        self.persist()
    }

    /// Removes the task at `index`. Out-of-range indices leave the list and
    /// the file untouched and return `Ok(None)`.
    pub fn remove_task(&mut self, index: usize) -> Result<Option<Task>> {
        if index >= self.tasks.len() {
            warn!("Ignoring remove of index {} (len {})", index, self.tasks.len());
            return Ok(None);
        }
        let removed = self.tasks.remove(index);
        info!("Removed task {}: {}", index, removed.description);
        self.persist()?;
        Ok(Some(removed))
    }

    /// Marks the task at `index` completed. Returns `Ok(false)` without
    /// touching anything when the index is out of range.
    pub fn mark_task_completed(&mut self, index: usize) -> Result<bool> {
        let Some(task) = self.tasks.get_mut(index) else {
            warn!("Ignoring complete of index {} (len {})", index, self.tasks.len());
            return Ok(false);
        };
        task.mark_completed();
        info!("Completed task {}: {}", index, task.description);
        self.persist()?;
        Ok(true)
    }

    pub fn list_tasks(&self) -> Vec<String> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| format_task_line(idx, task))
            .collect()
    }

    fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source: io::Error| TaskError::Io {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(io_err)?;

        let records = self
            .tasks
            .iter()
            .map(Task::to_record)
            .collect::<Result<Vec<_>>>()?;
        let content = serde_json::to_string_pretty(&records).map_err(TaskError::Encode)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|source| TaskError::Persist {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved {} tasks to {}", self.tasks.len(), self.path.display());
        Ok(())
    }
}

/// Renders one task the way `list_tasks` does.
pub fn format_task_line(index: usize, task: &Task) -> String {
    format!(
        "{}. {} [Priority: {}, Due: {}, Status: {}]",
        index,
        task.description,
        task.priority,
        task.due_label(),
        task.status_label()
    )
}

fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No task file at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(TaskError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let records: Vec<Value> = serde_json::from_str(&content)
        .map_err(|source| TaskError::malformed(source).in_file(path, None))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| Task::from_record(record).map_err(|e| e.in_file(path, Some(index))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn scratch() -> (TempDir, PathBuf) {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tasks.json");
        (temp, path)
    }

    fn seeded(path: &Path, descriptions: &[&str]) -> TaskList {
        let mut list = TaskList::open(path).unwrap();
        for d in descriptions {
            list.add_task(Task::new(*d)).unwrap();
        }
        list
    }

    #[test]
    fn test_open_nonexistent_is_empty() {
        let (_temp, path) = scratch();
        let list = TaskList::open(&path).unwrap();
        assert!(list.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_add_appends_in_order() {
        let (_temp, path) = scratch();
        let list = seeded(&path, &["a", "b", "c"]);

        let lines = list.list_tasks();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("0. a "));
        assert!(lines[1].starts_with("1. b "));
        assert!(lines[2].starts_with("2. c "));
    }

    #[test]
    fn test_add_allows_duplicates() {
        let (_temp, path) = scratch();
        let list = seeded(&path, &["same", "same"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.tasks()[0], list.tasks()[1]);
    }

    #[test]
    fn test_add_persists_immediately() {
        let (_temp, path) = scratch();
        let list = seeded(&path, &["Buy milk"]);
        let reopened = TaskList::open(&path).unwrap();
        assert_eq!(reopened.tasks(), list.tasks());
    }

    #[test]
    fn test_remove_shifts_later_tasks() {
        let (_temp, path) = scratch();
        let mut list = seeded(&path, &["a", "b", "c", "d"]);

        let removed = list.remove_task(1).unwrap();
        assert_eq!(removed.map(|t| t.description), Some("b".to_string()));

        let names: Vec<_> = list.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["a", "c", "d"]);
        assert_eq!(TaskList::open(&path).unwrap().tasks(), list.tasks());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let (_temp, path) = scratch();
        let mut list = seeded(&path, &["a", "b"]);
        let before = list.tasks().to_vec();
        let file_before = fs::read_to_string(&path).unwrap();

        assert_eq!(list.remove_task(2).unwrap(), None);
        assert_eq!(list.remove_task(usize::MAX).unwrap(), None);

        assert_eq!(list.tasks(), before.as_slice());
        assert_eq!(fs::read_to_string(&path).unwrap(), file_before);
    }

    #[test]
    fn test_remove_on_empty_list_does_not_create_file() {
        let (_temp, path) = scratch();
        let mut list = TaskList::open(&path).unwrap();
        assert_eq!(list.remove_task(0).unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_mark_completed_touches_only_target() {
        let (_temp, path) = scratch();
        let mut list = seeded(&path, &["a", "b", "c"]);

        assert!(list.mark_task_completed(1).unwrap());
        let flags: Vec<_> = list.tasks().iter().map(|t| t.completed).collect();
        assert_eq!(flags, [false, true, false]);

        let reopened = TaskList::open(&path).unwrap();
        assert!(reopened.get(1).unwrap().completed);
    }

    #[test]
    fn test_mark_completed_out_of_range_is_noop() {
        let (_temp, path) = scratch();
        let mut list = seeded(&path, &["a"]);
        let before = list.tasks().to_vec();

        assert!(!list.mark_task_completed(1).unwrap());
        assert_eq!(list.tasks(), before.as_slice());
    }

    #[test]
    fn test_list_line_format() {
        let (_temp, path) = scratch();
        let mut list = TaskList::open(&path).unwrap();
        list.add_task(Task::new("Buy milk")).unwrap();
        list.add_task(
            Task::new("File taxes")
                .with_priority("high")
                .with_due_date(Some("2024-04-15".to_string())),
        )
        .unwrap();
        list.mark_task_completed(1).unwrap();

        assert_eq!(
            list.list_tasks(),
            vec![
                "0. Buy milk [Priority: low, Due: No due date, Status: Pending]".to_string(),
                "1. File taxes [Priority: high, Due: 2024-04-15, Status: Done]".to_string(),
            ]
        );
    }

    #[test]
    fn test_reads_documented_format() {
        let (_temp, path) = scratch();
        fs::write(
            &path,
            r#"[
  {"description": "Buy milk", "priority": "low", "due_date": null, "completed": false},
  {"description": "File taxes", "priority": "high", "due_date": "2024-04-15", "completed": true}
]"#,
        )
        .unwrap();

        let list = TaskList::open(&path).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.tasks()[1].due_date.as_deref(), Some("2024-04-15"));
        assert!(list.tasks()[1].completed);
    }

    #[test]
    fn test_saved_file_is_array_of_records() {
        let (_temp, path) = scratch();
        let list = seeded(&path, &["Buy milk"]);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::Value::Array(vec![list.tasks()[0].to_record().unwrap()])
        );
    }

    #[test]
    fn test_saved_records_keep_field_order() {
        let (_temp, path) = scratch();
        seeded(&path, &["Buy milk"]);

        let content = fs::read_to_string(&path).unwrap();
        let positions: Vec<_> = ["description", "priority", "due_date", "completed"]
            .iter()
            .map(|key| content.find(&format!("\"{key}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_open_invalid_json_is_malformed() {
        let (_temp, path) = scratch();
        fs::write(&path, "{ invalid json }").unwrap();
        assert!(matches!(
            TaskList::open(&path),
            Err(TaskError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_open_empty_file_is_malformed() {
        let (_temp, path) = scratch();
        fs::write(&path, "").unwrap();
        assert!(matches!(
            TaskList::open(&path),
            Err(TaskError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_open_missing_due_date_key_is_malformed() {
        let (_temp, path) = scratch();
        fs::write(
            &path,
            r#"[
  {"description": "ok", "priority": "low", "due_date": null, "completed": false},
  {"description": "x", "priority": "low", "completed": false}
]"#,
        )
        .unwrap();
        match TaskList::open(&path) {
            Err(TaskError::MalformedRecord {
                path: Some(reported),
                index: Some(1),
                ..
            }) => assert_eq!(reported, path),
            other => panic!("expected malformed record 1, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_due_date_lists_as_no_due_date() {
        let (_temp, path) = scratch();
        fs::write(
            &path,
            r#"[{"description": "x", "priority": "low", "due_date": "", "completed": false}]"#,
        )
        .unwrap();

        let list = TaskList::open(&path).unwrap();
        assert_eq!(
            list.list_tasks(),
            vec!["0. x [Priority: low, Due: No due date, Status: Pending]".to_string()]
        );
    }

    #[test]
    fn test_empty_priority_is_stored_verbatim() {
        let (_temp, path) = scratch();
        let mut list = TaskList::open(&path).unwrap();
        list.add_task(Task::new("x").with_priority("")).unwrap();

        let reopened = TaskList::open(&path).unwrap();
        assert_eq!(reopened.tasks()[0].priority, "");
        assert_eq!(
            reopened.list_tasks(),
            vec!["0. x [Priority: , Due: No due date, Status: Pending]".to_string()]
        );
    }

    #[test]
    fn test_open_directory_is_io_error() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            TaskList::open(temp.path()),
            Err(TaskError::Io { .. })
        ));
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("dir").join("tasks.json");
        seeded(&path, &["a"]);
        assert!(path.exists());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        let path = blocker.join("tasks.json");

        let mut list = TaskList::open(&path).unwrap();
        fs::write(&blocker, "").unwrap();
        let result = list.add_task(Task::new("a"));

        assert!(matches!(result, Err(TaskError::Io { .. })));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_persist_leaves_no_temp_files() {
        let (temp, path) = scratch();
        seeded(&path, &["a", "b"]);
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
