use crate::core::config::LaunchSettings;

pub const PLAYER_NAME_TOKEN: &str = "${auth_player_name}";
pub const SESSION_TOKEN: &str = "${auth_session}";
pub const GAME_DIRECTORY_TOKEN: &str = "${game_directory}";
pub const GAME_ASSETS_TOKEN: &str = "${game_assets}";

/// Substitute the four legacy placeholders in `minecraftArguments`.
/// Any other `${...}` token is left untouched.
pub fn render_game_arguments(template: &str, settings: &LaunchSettings) -> String {
    [
        (PLAYER_NAME_TOKEN, settings.player_name.as_str()),
        (SESSION_TOKEN, settings.session_token.as_str()),
        (GAME_DIRECTORY_TOKEN, settings.game_directory.as_str()),
        (GAME_ASSETS_TOKEN, settings.assets_directory.as_str()),
    ]
    .iter()
    .fold(template.to_string(), |acc, (token, value)| {
        acc.replace(token, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const A111_TEMPLATE: &str =
        "${auth_player_name} ${auth_session} --gameDir ${game_directory} --assetsDir ${game_assets}";

    #[test]
    fn substitutes_all_four_tokens_in_order() {
        let settings = LaunchSettings {
            player_name: "Paffcio".into(),
            session_token: "tok123".into(),
            game_directory: "minecraft".into(),
            assets_directory: "minecraft/assets".into(),
            ..LaunchSettings::default()
        };

        let rendered = render_game_arguments(A111_TEMPLATE, &settings);

        for token in [
            PLAYER_NAME_TOKEN,
            SESSION_TOKEN,
            GAME_DIRECTORY_TOKEN,
            GAME_ASSETS_TOKEN,
        ] {
            assert!(!rendered.contains(token));
        }
        assert_eq!(
            rendered,
            "Paffcio tok123 --gameDir minecraft --assetsDir minecraft/assets"
        );

        let positions: Vec<usize> = ["Paffcio", "tok123", "--gameDir minecraft", "minecraft/assets"]
            .iter()
            .map(|value| rendered.find(value).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn repeated_tokens_are_all_replaced() {
        let rendered = render_game_arguments(
            "${auth_player_name} ${auth_player_name}",
            &LaunchSettings::default(),
        );
        assert_eq!(rendered, "Player Player");
    }

    #[test]
    fn unknown_tokens_are_left_alone() {
        let rendered = render_game_arguments(
            "${auth_player_name} --uuid ${auth_uuid}",
            &LaunchSettings::default(),
        );
        assert_eq!(rendered, "Player --uuid ${auth_uuid}");
    }
}
