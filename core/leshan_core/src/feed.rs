//! Community feed ("公益秀") with per-moment like toggles.

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    pub id: String,
    pub user: String,
    pub avatar: String,
    pub content: String,
    pub project: String,
    /// Donated amount in yuan, as shown on the card.
    pub amount: u32,
    pub likes: u32,
    pub time: String,
    pub is_liked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    moments: Vec<Moment>,
}

impl Default for Feed {
    fn default() -> Self {
        let moment = |id: &str, user: &str, avatar: &str, content: &str, project: &str, amount, likes, time: &str, is_liked| Moment {
            id: id.into(),
            user: user.into(),
            avatar: avatar.into(),
            content: content.into(),
            project: project.into(),
            amount,
            likes,
            time: time.into(),
            is_liked,
        };
        Self {
            moments: vec![
                moment(
                    "m1",
                    "李德尔",
                    "https://picsum.photos/100/101",
                    "今天为困境儿童项目捐赠了一点心意，希望孩子们能快乐成长。",
                    "爱上你，疗愈我",
                    50,
                    24,
                    "12分钟前",
                    false,
                ),
                moment(
                    "m2",
                    "张老师",
                    "https://picsum.photos/100/102",
                    "市南区的慈善氛围越来越好了，社区直达真的很方便。",
                    "湛山社区慈善基金",
                    200,
                    156,
                    "2小时前",
                    true,
                ),
                moment(
                    "m3",
                    "匿名爱心人士",
                    "https://picsum.photos/100/103",
                    "一份捐赠，万分关爱。",
                    "专项医疗救助",
                    100,
                    8,
                    "5小时前",
                    false,
                ),
            ],
        }
    }
}

impl Feed {
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    pub fn get(&self, id: &str) -> Option<&Moment> {
        self.moments.iter().find(|m| m.id == id)
    }

    /// Flip the like on `id`, moving the counter with it.
    pub fn toggle_like(&mut self, id: &str) -> Result<&Moment> {
        let moment = self
            .moments
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| CoreError::MomentNotFound(id.to_string()))?;

        if moment.is_liked {
            moment.likes = moment.likes.saturating_sub(1);
        } else {
            moment.likes += 1;
        }
        moment.is_liked = !moment.is_liked;
        Ok(moment)
    }
}
