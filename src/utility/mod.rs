// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   walk:  parallel_walk(), find_files(), WalkOptions
//!   copy:  copy_matching_async(), move_path(), remove_dir_all_if_exists()
//!   path:  normalize_path(), relative_to()
//! ```

pub mod fs;
