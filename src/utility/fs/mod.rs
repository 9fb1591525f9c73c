// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal and async copy.
//!
//! ```text
//! walk:  parallel_walk()  ignore::WalkParallel, sorted results
//!        find_files()     wax glob matching relative to the root
//!        WalkOptions      max_depth, hidden, gitignore
//! copy:  copy_matching_async()       top-level glob copy
//!        move_path(), move_path_blocking()  rename, else copy + delete
//!        remove_dir_all_if_exists()
//! path:  normalize_path(), absolute_normalized(), relative_to()
//! ```

pub mod copy;
pub mod path;
pub mod walk;
