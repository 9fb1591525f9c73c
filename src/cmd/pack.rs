// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pack command implementation for armorpack.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::pack::PackArgs;
use crate::config::Config;
use crate::error::Result;
use crate::pack::pipeline::pack;
use crate::pack::tools::ToolContext;

/// Main handler for pack command.
///
/// # Errors
///
/// Returns an error if the arguments cannot be turned into a job or any
/// pipeline stage fails.
pub async fn run_pack_command(args: &PackArgs, config: &Config, dry_run: bool) -> Result<()> {
    let request = args.to_request(config)?;
    let ctx = ToolContext::new(
        Arc::new(config.clone()),
        CancellationToken::new(),
        dry_run || config.global.dry,
    );

    let cancel_token = ctx.cancel_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting...");
            cancel_token.cancel();
        }
    });

    match pack(&ctx, request).await {
        Ok(output) => {
            println!("{}", output.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Pack failed");
            Err(e)
        }
    }
}
