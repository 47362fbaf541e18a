use std::path::{Path, PathBuf};

use serde_json::Value;

use super::models::BotConfig;
use super::Env;

const CONFIG_FILENAME: &str = ".homework-bot.yaml";

/// 설정 레이어를 순서대로 겹쳐 최종 설정을 만든다: 기본값 ← `~/` ← `--config-dir`.
///
/// 레이어는 raw YAML 값으로 합친 뒤 한 번만 역직렬화하므로
/// 파일에 적지 않은 키는 아래 레이어의 값이 그대로 남는다.
pub fn load_merged(env: &dyn Env, config_dir: Option<&Path>) -> BotConfig {
    let layers = [
        env.var("HOME").ok().map(|home| PathBuf::from(home).join(CONFIG_FILENAME)),
        config_dir.map(|dir| dir.join(CONFIG_FILENAME)),
    ];

    let Some(merged) = layers
        .iter()
        .flatten()
        .filter_map(|path| read_layer(path))
        .reduce(|mut base, over| {
            merge_into(&mut base, over);
            base
        })
    else {
        return BotConfig::default();
    };

    match serde_json::from_value::<BotConfig>(merged) {
        Ok(cfg) => cfg.sanitized(),
        Err(e) => {
            tracing::warn!("invalid config, falling back to defaults: {e}");
            BotConfig::default()
        }
    }
}

/// 없는 파일은 조용히 건너뛰고, 깨진 파일은 경고 후 건너뛴다
fn read_layer(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_yaml::from_str(&content)
        .map_err(|e| tracing::warn!("ignoring unparsable config {}: {e}", path.display()))
        .ok()
}

/// `over`에 값이 있는 키만 `base`에 덮어쓴다. 맵은 재귀적으로, null은 무시.
fn merge_into(base: &mut Value, over: Value) {
    match (base, over) {
        (_, Value::Null) => {}
        (Value::Object(b), Value::Object(o)) => {
            for (key, value) in o {
                match b.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None if !value.is_null() => {
                        b.insert(key, value);
                    }
                    None => {}
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// 글로벌 설정 파일 경로
pub fn global_config_path(env: &dyn Env) -> PathBuf {
    let home = env.var("HOME").unwrap_or_else(|_| ".".into());
    Path::new(&home).join(CONFIG_FILENAME)
}
