//! Command handlers: fetch resources and render them with iotctllib

use iotctllib::resources::{
    app_output_config, channel_output_config, device_preference_output_config, App,
    AppListOptions, Channel, ChannelListOptions, DevicePreference,
};
use iotctllib::{
    output_item_or_list, OutputFormat, ResourceApi, SnapshotClient, TableGenerator,
};

/// Settings shared by every command
pub struct RenderContext<'a, G: TableGenerator> {
    pub client: &'a SnapshotClient,
    pub generator: &'a G,
    pub format: OutputFormat,
}

/// Show one app or list apps
pub fn render_apps<G: TableGenerator>(
    ctx: &RenderContext<'_, G>,
    id: Option<&str>,
    options: &AppListOptions,
    verbose: bool,
) -> iotctllib::Result<String> {
    let config = app_output_config(verbose);
    output_item_or_list(
        ctx.generator,
        ctx.format,
        &config,
        id,
        || Ok(ctx.client.list_apps(options)),
        |id| ResourceApi::<App>::get(ctx.client, id),
    )
}

/// Show one channel or list channels
pub fn render_channels<G: TableGenerator>(
    ctx: &RenderContext<'_, G>,
    id: Option<&str>,
    options: &ChannelListOptions,
) -> iotctllib::Result<String> {
    let config = channel_output_config();
    output_item_or_list(
        ctx.generator,
        ctx.format,
        &config,
        id,
        || Ok(ctx.client.list_channels(options)),
        |id| ResourceApi::<Channel>::get(ctx.client, id),
    )
}

/// Show one device preference or list them
pub fn render_device_preferences<G: TableGenerator>(
    ctx: &RenderContext<'_, G>,
    id: Option<&str>,
) -> iotctllib::Result<String> {
    let config = device_preference_output_config();
    output_item_or_list(
        ctx.generator,
        ctx.format,
        &config,
        id,
        || ResourceApi::<DevicePreference>::list(ctx.client),
        |id| ResourceApi::<DevicePreference>::get(ctx.client, id),
    )
}
