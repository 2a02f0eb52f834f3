//! Default field projections for guided search hits

pub const PROFILE_SEARCH_DECORATION: &str = "(trackingId,hitInfo(com.linkedin.voyager.search.FacetSuggestion,com.linkedin.voyager.search.SecondaryResultContainer,com.linkedin.voyager.search.SearchProfile(*,id,educations,memberBadges(influencer,jobSeeker,openLink,premium),miniProfile(backgroundImage,firstName,lastName,occupation,objectUrn,picture,publicIdentifier,trackingId))))";

pub const GROUP_SEARCH_DECORATION: &str = "(trackingId,hitInfo(com.linkedin.voyager.search.FacetSuggestion,com.linkedin.voyager.search.SecondaryResultContainer,com.linkedin.voyager.search.SearchGroup(id,memberCount,open,group(groupDescription,groupName,logo,objectUrn,recentActivityCount,trackingId))))";

pub const SCHOOL_SEARCH_DECORATION: &str = "(trackingId,hitInfo(com.linkedin.voyager.search.FacetSuggestion,com.linkedin.voyager.search.SecondaryResultContainer,com.linkedin.voyager.search.SearchSchool(backendUrn,id,location,studentAndAlumniCount,following(followerCount,following,followingCount),school(active,logo,objectUrn,schoolName,trackingId))))";
